//! Query state and projection engine.
//!
//! `project` is a pure function of the current generation and the
//! active query: the same inputs always produce the same ordered
//! output. Nothing here mutates the store.

pub mod error;
pub mod projection;
pub mod query;

pub use error::{ProjectError, ProjectResult};
pub use projection::project;
pub use query::{SortDirection, SortKey, SortSpec, StageFilter, TableQuery};
