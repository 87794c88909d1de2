//! Feed adapter for the tokengrid store.
//!
//! Consumes batches of instrument updates from a `BatchProducer`
//! (one batch per tick) and applies them to the store as atomic
//! merges. Ships a rand-driven `SimulatedFeed` standing in for a
//! real market feed.

pub mod adapter;
pub mod error;
pub mod event;
pub mod producer;

pub use adapter::{spawn_feed, FeedAdapterConfig, FeedHandle, DEFAULT_TICK_INTERVAL_MS};
pub use error::{FeedError, FeedResult};
pub use event::FeedEvent;
pub use producer::{demo_catalog, BatchProducer, SimulatedFeed};
