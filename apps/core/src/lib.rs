//! Storefront core: query dispatch, debounced autocomplete, the inactivity
//! prompt and the analysis/itinerary modal of a travel-search storefront.
//!
//! All state lives in a single dispatcher task driven through
//! [`StorefrontHandle`]; the rendered view is published on a `watch` channel.

pub mod actors;
pub mod analysis;
pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod render;
pub mod search;
pub mod telemetry;

#[cfg(test)]
mod tests;

pub use actors::{Key, StorefrontHandle};
pub use config::SearchConfig;
pub use error::AppError;
pub use query::{classify, QueryClass, QueryClassifier};
pub use search::{DispatchState, StorefrontView};
