use crate::error::AppError;
use crate::models::{
    AnalysisOutcome, AutocompleteResponse, ContactRequest, ContactResponse, DestinationsResponse,
    ItineraryRequest, ItineraryResponse,
};
use async_trait::async_trait;

/// Defines the public interface for the storefront's destination service.
///
/// This trait abstracts the HTTP collaborator so the dispatcher can be driven
/// by in-memory backends in tests.
#[async_trait]
pub trait SearchBackend: Send + Sync + 'static {
    /// Lists every destination (`GET {base}/destinations`).
    async fn destinations(&self) -> Result<DestinationsResponse, AppError>;

    /// Suggestions for a partial query (`GET {base}/search/autocomplete?q=`).
    async fn autocomplete(&self, query: String) -> Result<AutocompleteResponse, AppError>;

    /// Destinations matching a simple query (`GET {base}/search/destinations?q=`).
    async fn search_destinations(&self, query: String) -> Result<DestinationsResponse, AppError>;
}

/// Defines the public interface for the query analysis and itinerary service.
#[async_trait]
pub trait AnalysisBackend: Send + Sync + 'static {
    /// Interprets a free-text query (`POST {analysis_base}/api/search`).
    async fn analyze(&self, query: String) -> Result<AnalysisOutcome, AppError>;

    /// Sends contact details for a zero-result query (`POST {analysis_base}/api/submit-contact`).
    async fn submit_contact(&self, request: ContactRequest) -> Result<ContactResponse, AppError>;

    /// Builds an itinerary from an analysis and the current selections
    /// (`POST {analysis_base}/api/generate-itinerary`).
    async fn generate_itinerary(&self, request: ItineraryRequest) -> Result<ItineraryResponse, AppError>;
}

/// The search input the storefront draws into.
///
/// Passed explicitly to the components that move focus, instead of being
/// looked up at runtime.
pub trait InputControl: Send + Sync + 'static {
    fn focus(&self);

    /// Moves the caret to `position` (in characters).
    fn place_caret(&self, position: usize);
}

/// An input that ignores focus requests, for headless use.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedInput;

impl InputControl for DetachedInput {
    fn focus(&self) {}

    fn place_caret(&self, _position: usize) {}
}
