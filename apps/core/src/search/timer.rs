//! Cancel-and-restart timer owned by a single component.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// A one-shot timer that delivers a message to the owning actor when it
/// expires.
///
/// At most one expiry is pending: arming cancels the previous one. Each arm
/// gets a new generation, and [`OneShotTimer::fire`] only accepts the current
/// one, so an expiry message that was already queued when the timer was
/// cancelled is recognised as stale. The pending task is aborted on drop.
#[derive(Debug)]
pub struct OneShotTimer {
    name: &'static str,
    delay: Duration,
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

impl OneShotTimer {
    pub fn new(name: &'static str, delay: Duration) -> Self {
        Self {
            name,
            delay,
            generation: 0,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Starts the timer, replacing any pending expiry. `message` builds the
    /// expiry message from the generation stamp.
    pub fn arm<M, F>(&mut self, sender: mpsc::Sender<M>, message: F) -> u64
    where
        M: Send + 'static,
        F: FnOnce(u64) -> M + Send + 'static,
    {
        self.cancel();
        self.generation += 1;
        let generation = self.generation;
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = sender.send(message(generation)).await;
        }));
        debug!(timer = self.name, generation, ?delay, "timer armed");
        generation
    }

    /// Cancels the pending expiry, if any. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                handle.abort();
                // Invalidate an expiry that may already sit in the mailbox.
                self.generation += 1;
                debug!(timer = self.name, "timer cancelled");
                true
            }
            None => false,
        }
    }

    /// Consumes an expiry. Returns `true` only for the current, still pending
    /// generation.
    pub fn fire(&mut self, generation: u64) -> bool {
        if self.pending.is_some() && generation == self.generation {
            self.pending = None;
            true
        } else {
            debug!(timer = self.name, generation, current = self.generation, "stale timer expiry ignored");
            false
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Drop for OneShotTimer {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_expiry_is_delivered_once() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut timer = OneShotTimer::new("test", Duration::from_millis(300));

        let generation = timer.arm(tx, |g| g);
        assert!(timer.is_pending());

        let received = rx.recv().await.unwrap();
        assert_eq!(received, generation);
        assert!(timer.fire(received));
        assert!(!timer.is_pending());
        assert!(!timer.fire(received));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_replaces_pending_expiry() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut timer = OneShotTimer::new("test", Duration::from_millis(300));

        timer.arm(tx.clone(), |g| g);
        tokio::time::sleep(Duration::from_millis(200)).await;
        let second = timer.arm(tx, |g| g);

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(rx.try_recv().is_err(), "first expiry must not be delivered");

        let received = rx.recv().await.unwrap();
        assert_eq!(received, second);
        assert!(timer.fire(received));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_invalidates_queued_expiry() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut timer = OneShotTimer::new("test", Duration::from_millis(10));

        let generation = timer.arm(tx, |g| g);
        tokio::time::sleep(Duration::from_millis(20)).await;
        // The expiry is already queued; cancelling afterwards must still win.
        assert!(timer.cancel());
        let queued = rx.recv().await.unwrap();
        assert_eq!(queued, generation);
        assert!(!timer.fire(queued));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_pending_task() {
        let (tx, mut rx) = mpsc::channel::<u64>(8);
        {
            let mut timer = OneShotTimer::new("test", Duration::from_millis(50));
            timer.arm(tx, |g| g);
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(rx.recv().await.is_none());
    }
}
