//! Delta/highlight tracking between store generations.
//!
//! Compares each tracked field's current value against its
//! previous-generation counterpart, classifies the transition as an
//! increase or decrease, and holds that classification for a bounded
//! duration before it expires on its own.

pub mod sweeper;
pub mod tracker;

pub use sweeper::{spawn_sweeper, SweeperHandle};
pub use tracker::{
    Direction, HighlightConfig, HighlightTracker, TrackedField, DEFAULT_HIGHLIGHT_DURATION_MS,
};
