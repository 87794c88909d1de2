//! Read-side table assembly.
//!
//! Combines the projection engine with the highlight tracker to turn
//! a store snapshot plus the active query into the rows a renderer
//! consumes, with header totals computed over the full instrument set.

pub mod state;
pub mod types;

pub use state::TableView;
pub use types::{RowHighlights, RowSnapshot, TableRow, TableSnapshot, TableTotals};
