//! Inactivity prompt: nudges the user after a quiet period of no typing.

use super::timer::OneShotTimer;
use crate::actors::traits::InputControl;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

/// Watches the query for idle time and owns the prompt's visibility.
///
/// Holds the search input it returns focus to when the user chooses to keep
/// typing.
pub struct InactivityPrompter {
    timer: OneShotTimer,
    min_chars: usize,
    visible: bool,
    input: Arc<dyn InputControl>,
}

impl std::fmt::Debug for InactivityPrompter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InactivityPrompter")
            .field("timer", &self.timer)
            .field("min_chars", &self.min_chars)
            .field("visible", &self.visible)
            .finish()
    }
}

impl InactivityPrompter {
    pub fn new(delay: Duration, min_chars: usize, input: Arc<dyn InputControl>) -> Self {
        Self {
            timer: OneShotTimer::new("inactivity_prompt", delay),
            min_chars,
            visible: false,
            input,
        }
    }

    /// Every edit dismisses the prompt and restarts the quiet period when the
    /// trimmed query is long enough.
    pub fn on_query_change<M, F>(&mut self, query: &str, sender: mpsc::Sender<M>, elapsed: F)
    where
        M: Send + 'static,
        F: FnOnce(u64) -> M + Send + 'static,
    {
        self.timer.cancel();
        self.visible = false;

        let trimmed = query.trim();
        if !trimmed.is_empty() && trimmed.chars().count() > self.min_chars {
            self.timer.arm(sender, elapsed);
        }
    }

    /// Accepts a timer expiry. Returns `true` when the prompt became visible.
    pub fn on_elapsed(&mut self, generation: u64) -> bool {
        if !self.timer.fire(generation) {
            return false;
        }
        info!("No typing for {:?}, showing search prompt", self.timer.delay());
        self.visible = true;
        true
    }

    /// "Search now". Returns `false` when no prompt was showing; the caller
    /// dispatches the search otherwise.
    pub fn search_now(&mut self) -> bool {
        self.resolve()
    }

    /// "Add more": dismisses the prompt and puts the caret at the end of the
    /// current text. Returns `false` when no prompt was showing.
    pub fn add_more(&mut self, query: &str) -> bool {
        if !self.resolve() {
            return false;
        }
        self.input.focus();
        self.input.place_caret(query.chars().count());
        true
    }

    /// Cancels the timer and hides the prompt without resolving it (submission).
    pub fn reset(&mut self) {
        self.timer.cancel();
        self.visible = false;
    }

    fn resolve(&mut self) -> bool {
        let was_visible = self.visible;
        self.reset();
        was_visible
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_pending(&self) -> bool {
        self.timer.is_pending()
    }
}
