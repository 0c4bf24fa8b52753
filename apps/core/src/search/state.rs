//! Dispatch state and the snapshot published to front ends.

use crate::analysis::AnalysisModal;
use crate::models::{Destination, Suggestion, ALL_CATEGORY};
use serde::Serialize;
use std::fmt;

/// Where the storefront is in the search cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DispatchState {
    #[default]
    Idle,
    /// The suggestion dropdown is showing.
    Suggesting,
    /// A simple search is in flight.
    Searching,
    ShowingSimpleResults,
    ShowingAnalysis,
}

impl DispatchState {
    /// Idle and Suggesting only differ by dropdown visibility.
    pub fn is_browsing(&self) -> bool {
        matches!(self, DispatchState::Idle | DispatchState::Suggesting)
    }
}

impl fmt::Display for DispatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DispatchState::Idle => "idle",
            DispatchState::Suggesting => "suggesting",
            DispatchState::Searching => "searching",
            DispatchState::ShowingSimpleResults => "showing_simple_results",
            DispatchState::ShowingAnalysis => "showing_analysis",
        };
        write!(f, "{}", label)
    }
}

/// Everything a front end needs to draw the storefront.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorefrontView {
    /// Always the sanitized value.
    pub query: String,
    pub focused: bool,
    pub state: DispatchState,
    pub loading: bool,
    pub suggestions: Vec<Suggestion>,
    pub show_suggestions: bool,
    pub destinations: Vec<Destination>,
    pub selected_category: String,
    pub show_prompt: bool,
    pub analysis: Option<AnalysisModal>,
}

impl Default for StorefrontView {
    fn default() -> Self {
        Self {
            query: String::new(),
            focused: false,
            state: DispatchState::Idle,
            loading: false,
            suggestions: Vec::new(),
            show_suggestions: false,
            destinations: Vec::new(),
            selected_category: ALL_CATEGORY.to_string(),
            show_prompt: false,
            analysis: None,
        }
    }
}

impl StorefrontView {
    /// Suggestions that should actually be drawn.
    pub fn visible_suggestions(&self) -> &[Suggestion] {
        if self.show_suggestions {
            &self.suggestions
        } else {
            &[]
        }
    }
}
