//! Periodic delivery loop.
//!
//! Pulls one batch per tick from the producer, validates every event
//! at the boundary, and applies the batch to the store atomically.
//! The loop owns no instrument state.

use crate::event::FeedEvent;
use crate::producer::BatchProducer;
use std::sync::Arc;
use std::time::Duration;
use tokengrid_store::{InstrumentStore, InstrumentUpdate};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Default delivery interval: one batch every 3 seconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 3_000;

/// Feed adapter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedAdapterConfig {
    /// Delivery interval in milliseconds.
    pub tick_interval_ms: u64,
}

impl Default for FeedAdapterConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
        }
    }
}

/// Handle to a running feed loop.
///
/// `stop` releases the periodic timer; it is idempotent and safe to
/// call during teardown even while a delivery is logically in
/// flight. Any batch produced after stop is dropped, not queued.
#[derive(Debug)]
pub struct FeedHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl FeedHandle {
    /// Request the loop to stop. Calling this more than once is a
    /// no-op, not an error.
    pub fn stop(&self) {
        self.token.cancel();
    }

    /// Whether stop has been requested.
    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait for the loop to exit.
    pub async fn join(self) {
        let _ = self.task.await;
    }
}

/// Spawn the periodic feed loop.
pub fn spawn_feed<P>(
    store: Arc<InstrumentStore>,
    mut producer: P,
    config: FeedAdapterConfig,
) -> FeedHandle
where
    P: BatchProducer + 'static,
{
    let token = CancellationToken::new();
    let loop_token = token.clone();

    let task = tokio::spawn(async move {
        info!(
            interval_ms = config.tick_interval_ms,
            "Feed adapter started"
        );
        let mut ticker = tokio::time::interval(Duration::from_millis(config.tick_interval_ms));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // The first tick fires immediately; consume it so the first
        // delivery happens one full interval after start.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = loop_token.cancelled() => {
                    info!("Feed adapter stopped");
                    break;
                }
                _ = ticker.tick() => {
                    if loop_token.is_cancelled() {
                        debug!("Dropping batch produced after stop");
                        break;
                    }
                    if !deliver_tick(&store, &mut producer) {
                        break;
                    }
                }
            }
        }
    });

    FeedHandle { token, task }
}

/// Deliver one tick. Returns `false` if the loop must terminate.
fn deliver_tick<P: BatchProducer>(store: &InstrumentStore, producer: &mut P) -> bool {
    let Some(batch) = producer.next_batch() else {
        // Transient feed failure: skip the tick, the store is left
        // unchanged and the previous generation is not advanced.
        debug!("Feed unavailable, skipping tick");
        return true;
    };

    let updates = validate_batch(batch);
    if updates.is_empty() {
        debug!("No valid events in batch, skipping tick");
        return true;
    }

    match store.apply_batch(&updates) {
        Ok(outcome) => {
            debug!(
                applied = outcome.applied,
                skipped = outcome.skipped,
                version = outcome.version,
                "Batch applied"
            );
            true
        }
        Err(err) => {
            // Invariant violations indicate broken merge logic, not
            // an expected external failure. Stop delivering.
            error!(error = %err, "Fatal store fault, stopping feed");
            false
        }
    }
}

/// Drop malformed events with a warning; keep the valid remainder.
fn validate_batch(batch: Vec<FeedEvent>) -> Vec<InstrumentUpdate> {
    batch
        .into_iter()
        .filter_map(|event| match event.validate() {
            Ok(()) => Some(event.into_update()),
            Err(err) => {
                warn!(error = %err, "Rejecting malformed feed event");
                None
            }
        })
        .collect()
}
