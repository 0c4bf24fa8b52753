//! # Actors Module
//!
//! The storefront dispatcher and the collaborators it talks to.
//!
//! ## Components
//! - `dispatcher`: the search dispatcher actor and its cloneable handle
//! - `messages`: everything the dispatcher's mailbox accepts
//! - `traits`: backend and input seams
//! - `storefront_api`, `analysis_api`: reqwest implementations of the backends

pub mod analysis_api;
pub mod dispatcher;
pub mod messages;
pub mod storefront_api;
pub mod traits;

pub use analysis_api::HttpAnalysisApi;
pub use dispatcher::StorefrontHandle;
pub use messages::{Key, StorefrontMessage};
pub use storefront_api::HttpStorefrontApi;
pub use traits::{AnalysisBackend, DetachedInput, InputControl, SearchBackend};
