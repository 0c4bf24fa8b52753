//! # Search Module
//!
//! Components owned by the search dispatcher.
//!
//! ## Components
//! - `timer`: cancel-and-restart one-shot timer
//! - `autocomplete`: debounced suggestion fetching and dropdown visibility
//! - `prompter`: inactivity prompt after a quiet period
//! - `state`: dispatch state and the published view snapshot

pub mod autocomplete;
pub mod prompter;
pub mod state;
pub mod timer;

pub use autocomplete::{AutocompleteController, QueryChange};
pub use prompter::InactivityPrompter;
pub use state::{DispatchState, StorefrontView};
pub use timer::OneShotTimer;
