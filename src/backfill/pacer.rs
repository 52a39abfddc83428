use std::time::Duration;

use tokio::time::{Instant, sleep_until};

/// Enforces a fixed idle gap between consecutive provider requests.
///
/// The gap is measured from the end of one request to the start of the next,
/// so a slow provider never gets back-to-back calls.
#[derive(Debug, Clone)]
pub struct FixedDelayPacer {
    delay: Duration,
    last_done: Option<Instant>,
}

impl FixedDelayPacer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_done: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Waits until `delay` has passed since the last [`mark_done`](Self::mark_done).
    /// Returns immediately before the first request.
    pub async fn wait(&self) {
        if let Some(last_done) = self.last_done {
            sleep_until(last_done + self.delay).await;
        }
    }

    /// Records that the current request has finished.
    pub fn mark_done(&mut self) {
        self.last_done = Some(Instant::now());
    }
}
