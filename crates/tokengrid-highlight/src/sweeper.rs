//! Background sweeper that evicts expired highlight entries.
//!
//! Expiry is already enforced on the read path by deadline checks;
//! the sweeper only keeps the map from accumulating dead entries for
//! keys nobody queries again.

use crate::tracker::HighlightTracker;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Handle to a running sweeper task.
pub struct SweeperHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Request shutdown. Idempotent.
    pub fn stop(&self) {
        self.token.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait for the task to finish after `stop`.
    pub async fn join(self) -> Result<(), tokio::task::JoinError> {
        self.task.await
    }
}

/// Spawn the sweeper loop on the current runtime.
pub fn spawn_sweeper(tracker: Arc<HighlightTracker>, sweep_interval: Duration) -> SweeperHandle {
    let token = CancellationToken::new();
    let task = tokio::spawn(run(tracker, sweep_interval, token.clone()));
    SweeperHandle { token, task }
}

async fn run(tracker: Arc<HighlightTracker>, sweep_interval: Duration, token: CancellationToken) {
    info!(interval_ms = sweep_interval.as_millis() as u64, "highlight sweeper started");

    let mut ticker = tokio::time::interval(sweep_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The interval's first tick fires immediately; consume it so the
    // first sweep happens one full interval in.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = token.cancelled() => {
                info!("highlight sweeper stopped");
                return;
            }
            _ = ticker.tick() => {
                let removed = tracker.sweep(Instant::now());
                if removed > 0 {
                    debug!(removed, remaining = tracker.len(), "swept expired highlights");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::{HighlightConfig, TrackedField};
    use rust_decimal_macros::dec;
    use tokengrid_core::InstrumentId;

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_evicts_expired_entries() {
        let tracker = Arc::new(HighlightTracker::new(HighlightConfig {
            duration: Duration::from_millis(500),
        }));
        let id = InstrumentId::from("1");
        tracker.observe(&id, TrackedField::Price, dec!(12), Some(dec!(10)), Instant::now());
        assert_eq!(tracker.len(), 1);

        let handle = spawn_sweeper(Arc::clone(&tracker), Duration::from_millis(250));

        // First sweep at 250ms: highlight still live.
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(tracker.len(), 1);

        // By 750ms the 500ms deadline has passed and a sweep has run.
        tokio::time::sleep(Duration::from_millis(450)).await;
        assert_eq!(tracker.len(), 0);

        handle.stop();
        handle.join().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_is_idempotent_and_joins() {
        let tracker = Arc::new(HighlightTracker::default());
        let handle = spawn_sweeper(tracker, Duration::from_millis(100));

        handle.stop();
        handle.stop();
        assert!(handle.is_stopped());
        handle.join().await.unwrap();
    }
}
