//! Two-generation instrument store.
//!
//! Holds the authoritative current snapshot of every tracked
//! instrument plus the generation immediately before the last
//! applied batch, so per-field deltas can be computed downstream.

pub mod error;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use store::{AppliedBatch, InstrumentStore, InstrumentUpdate, StoreSnapshot};
