use crate::error::AppError;
use crate::models::{
    AnalysisOutcome, AutocompleteResponse, ContactResponse, DestinationsResponse, ItineraryResponse,
};
use crate::search::StorefrontView;
use tokio::sync::oneshot;

/// Keys the search box reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Other,
}

/// Messages that can be sent to the storefront dispatcher.
///
/// The first group comes from the user through the handle; the second group
/// is posted by the dispatcher's own timers and fetch tasks.
#[derive(Debug)]
pub enum StorefrontMessage {
    /// The text in the search box changed (raw, unsanitized).
    QueryEdited { raw: String },
    /// Explicit submit (search button).
    Submit,
    KeyPressed(Key),
    /// A dropdown entry was clicked.
    SuggestionSelected { index: usize },
    InputFocused,
    InputBlurred,
    CategorySelected { category: String },
    /// "Search now" on the inactivity prompt.
    PromptSearchNow,
    /// "Add more" on the inactivity prompt.
    PromptAddMore,
    CloseAnalysis,
    /// Selection (or free text) for an ambiguous analysis component.
    OptionChosen { key: String, value: String },
    SubmitContact {
        email: String,
        phone: Option<String>,
        /// Receives the reference id, or the error to surface to the user.
        responder: oneshot::Sender<Result<String, AppError>>,
    },
    /// A request for the current view, answered after every earlier message.
    Snapshot {
        responder: oneshot::Sender<StorefrontView>,
    },
    /// A command to stop the dispatcher and release its timers.
    Shutdown,

    // --- Internal ---
    DebounceElapsed { generation: u64, query: String },
    PromptElapsed { generation: u64 },
    SuggestionsLoaded {
        seq: u64,
        result: Result<AutocompleteResponse, AppError>,
    },
    SearchCompleted {
        seq: u64,
        result: Result<DestinationsResponse, AppError>,
    },
    DestinationsLoaded {
        seq: u64,
        result: Result<DestinationsResponse, AppError>,
    },
    AnalysisLoaded {
        seq: u64,
        result: Result<AnalysisOutcome, AppError>,
    },
    ItineraryLoaded {
        analysis_seq: u64,
        seq: u64,
        result: Result<ItineraryResponse, AppError>,
    },
    ContactCompleted {
        analysis_seq: u64,
        result: Result<ContactResponse, AppError>,
        responder: oneshot::Sender<Result<String, AppError>>,
    },
}
