//! The projection pipeline: search filter, stage filter, stable sort.
//!
//! `project` is referentially transparent: it can be recomputed from
//! `(current generation, query)` at any time and yields an identical
//! result. The pipeline stages run strictly in this order.

use crate::query::{SortDirection, SortKey, TableQuery};
use rust_decimal::Decimal;
use std::sync::Arc;
use tokengrid_core::Instrument;

/// Compute the ordered, filtered projection of `instruments`.
///
/// 1. Search filter: case-insensitive substring on name OR symbol;
///    empty search text keeps everything.
/// 2. Stage filter: exact match unless the filter is `All`.
/// 3. Stable sort by the numeric sort key; ties and unsorted queries
///    preserve the post-filter input order.
///
/// An empty result is valid output, not an error.
pub fn project(instruments: &[Arc<Instrument>], query: &TableQuery) -> Vec<Arc<Instrument>> {
    let needle = query.search.trim().to_lowercase();

    let mut rows: Vec<Arc<Instrument>> = instruments
        .iter()
        .filter(|inst| matches_search(inst, &needle))
        .filter(|inst| query.stage_filter.matches(inst))
        .cloned()
        .collect();

    if let Some(spec) = query.sort {
        // Vec::sort_by is stable, and reversing an `Ordering` keeps
        // `Equal` as `Equal`, so ties hold their input order in both
        // directions.
        rows.sort_by(|a, b| {
            let ordering = sort_value(a, spec.key).cmp(&sort_value(b, spec.key));
            match spec.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }

    rows
}

fn matches_search(instrument: &Instrument, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    instrument.name.to_lowercase().contains(needle)
        || instrument.symbol.to_lowercase().contains(needle)
}

fn sort_value(instrument: &Instrument, key: SortKey) -> Decimal {
    match key {
        SortKey::MarketCap => instrument.market_cap.inner(),
        SortKey::Price => instrument.price.inner(),
        SortKey::Volume24h => instrument.volume_24h.inner(),
        SortKey::Change24h => instrument.change_24h,
    }
}
