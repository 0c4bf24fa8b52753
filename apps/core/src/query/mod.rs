//! # Query Module
//!
//! Pure, synchronous handling of the search string.
//!
//! ## Components
//! - `sanitize`: strips characters the search box does not accept
//! - `classifier`: decides whether a query goes to the simple listing or the analysis modal

pub mod classifier;
pub mod sanitize;

pub use classifier::{classify, QueryClass, QueryClassifier};
pub use sanitize::sanitize;
