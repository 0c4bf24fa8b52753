//! Debounced autocomplete under the search box.

use super::timer::OneShotTimer;
use crate::error::AppError;
use crate::models::{AutocompleteResponse, Suggestion};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// What the owner must do after a query edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryChange {
    /// Below the floor: list and dropdown were cleared synchronously.
    Cleared,
    /// A fetch is scheduled after the quiet period.
    Scheduled,
}

/// Owns the debounce timer and the suggestion list.
///
/// The controller never performs I/O itself: it tells its owner when a fetch
/// is due ([`AutocompleteController::on_debounce_elapsed`]) and is handed the
/// result back ([`AutocompleteController::apply`]). Every fetch is stamped
/// with a sequence number; results for anything but the latest are dropped.
#[derive(Debug)]
pub struct AutocompleteController {
    timer: OneShotTimer,
    min_chars: usize,
    fetch_seq: u64,
    suggestions: Vec<Suggestion>,
    visible: bool,
}

impl AutocompleteController {
    pub fn new(debounce: Duration, min_chars: usize) -> Self {
        Self {
            timer: OneShotTimer::new("autocomplete", debounce),
            min_chars,
            fetch_seq: 0,
            suggestions: Vec::new(),
            visible: false,
        }
    }

    /// Restarts the quiet period for `query`, or clears everything when the
    /// query is below the floor.
    pub fn on_query_change<M, F>(&mut self, query: &str, sender: mpsc::Sender<M>, elapsed: F) -> QueryChange
    where
        M: Send + 'static,
        F: FnOnce(u64, String) -> M + Send + 'static,
    {
        if query.chars().count() < self.min_chars {
            self.discard();
            return QueryChange::Cleared;
        }
        let query = query.to_string();
        self.timer.arm(sender, move |generation| elapsed(generation, query));
        QueryChange::Scheduled
    }

    /// Accepts a debounce expiry. Returns the sequence number to stamp on the
    /// fetch, or `None` when the expiry was superseded.
    pub fn on_debounce_elapsed(&mut self, generation: u64) -> Option<u64> {
        if !self.timer.fire(generation) {
            return None;
        }
        self.fetch_seq += 1;
        Some(self.fetch_seq)
    }

    /// Applies a fetch result. Returns `false` when the result was stale.
    pub fn apply(&mut self, seq: u64, result: Result<AutocompleteResponse, AppError>) -> bool {
        if seq != self.fetch_seq {
            debug!(seq, latest = self.fetch_seq, "stale autocomplete response dropped");
            return false;
        }
        match result {
            Ok(response) => {
                self.visible = response.success && !response.suggestions.is_empty();
                self.suggestions = response.suggestions;
            }
            Err(e) => {
                warn!("Autocomplete error: {}", e);
                self.suggestions.clear();
                self.visible = false;
            }
        }
        true
    }

    /// Hides the dropdown but keeps the list (Escape).
    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Cancels the pending fetch, ignores any in-flight one, and clears the list.
    pub fn discard(&mut self) {
        self.timer.cancel();
        self.fetch_seq += 1;
        self.suggestions.clear();
        self.visible = false;
    }

    pub fn suggestion(&self, index: usize) -> Option<&Suggestion> {
        self.suggestions.get(index)
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_pending(&self) -> bool {
        self.timer.is_pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggestions(texts: &[&str]) -> AutocompleteResponse {
        AutocompleteResponse {
            success: true,
            suggestions: texts
                .iter()
                .map(|t| Suggestion {
                    text: t.to_string(),
                    description: String::new(),
                })
                .collect(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_query_clears_synchronously() {
        let (tx, mut rx) = mpsc::channel::<(u64, String)>(8);
        let mut controller = AutocompleteController::new(Duration::from_millis(300), 2);

        assert_eq!(controller.on_query_change("Ag", tx.clone(), |g, q| (g, q)), QueryChange::Scheduled);
        let (generation, _) = rx.recv().await.unwrap();
        let seq = controller.on_debounce_elapsed(generation).unwrap();
        controller.apply(seq, Ok(suggestions(&["Agra Fort"])));
        assert!(controller.is_visible());

        assert_eq!(controller.on_query_change("A", tx, |g, q| (g, q)), QueryChange::Cleared);
        assert!(!controller.is_visible());
        assert!(controller.suggestions().is_empty());
        assert!(!controller.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_keystroke_wins() {
        let (tx, mut rx) = mpsc::channel::<(u64, String)>(8);
        let mut controller = AutocompleteController::new(Duration::from_millis(300), 2);

        for q in ["Ja", "Jai", "Jaip", "Jaipu", "Jaipur"] {
            controller.on_query_change(q, tx.clone(), |g, q| (g, q));
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        drop(tx);

        let mut due = Vec::new();
        while let Some((generation, query)) = rx.recv().await {
            if controller.on_debounce_elapsed(generation).is_some() {
                due.push(query);
            }
        }
        assert_eq!(due, vec!["Jaipur".to_string()]);
    }

    #[tokio::test]
    async fn test_unsuccessful_response_hides_dropdown() {
        let (tx, _rx) = mpsc::channel::<(u64, String)>(8);
        let mut controller = AutocompleteController::new(Duration::from_millis(300), 2);
        controller.on_query_change("Goa", tx, |g, q| (g, q));

        let mut response = suggestions(&["Goa Beaches"]);
        response.success = false;
        controller.fetch_seq = 1;
        assert!(controller.apply(1, Ok(response)));
        assert!(!controller.is_visible());
    }

    #[test]
    fn test_error_clears_and_stale_is_dropped() {
        let mut controller = AutocompleteController::new(Duration::from_millis(300), 2);
        controller.fetch_seq = 2;
        assert!(!controller.apply(1, Ok(suggestions(&["Stale"]))));
        assert!(controller.suggestions().is_empty());

        assert!(controller.apply(2, Ok(suggestions(&["Kochi"]))));
        assert!(controller.is_visible());
        assert!(controller.apply(2, Err(AppError::Http("connection refused".into()))));
        assert!(!controller.is_visible());
        assert!(controller.suggestions().is_empty());
    }
}
