//! Table view state and snapshot assembly.

use crate::types::{RowHighlights, TableRow, TableSnapshot, TableTotals};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokengrid_highlight::{HighlightTracker, TrackedField};
use tokengrid_project::{project, SortDirection, SortKey, SortSpec, StageFilter, TableQuery};
use tokengrid_store::InstrumentStore;
use tokio::time::Instant;
use tracing::debug;

/// The read-side state for one table: the store, the highlight
/// tracker, and the active query.
///
/// Query mutations only change what the next `refresh` computes;
/// instrument data is never touched from here.
pub struct TableView {
    store: Arc<InstrumentStore>,
    tracker: Arc<HighlightTracker>,
    query: RwLock<TableQuery>,
    // Store version of the last generation fed to the tracker, so a
    // refresh without an intervening batch does not restart highlight
    // deadlines.
    observed_version: AtomicU64,
}

impl TableView {
    /// Build a view over a store. The initial query sorts by market
    /// cap, descending, with no search and no stage filter.
    pub fn new(store: Arc<InstrumentStore>, tracker: Arc<HighlightTracker>) -> Self {
        let query = TableQuery {
            sort: Some(SortSpec {
                key: SortKey::MarketCap,
                direction: SortDirection::Descending,
            }),
            ..TableQuery::default()
        };
        Self {
            store,
            tracker,
            query: RwLock::new(query),
            observed_version: AtomicU64::new(0),
        }
    }

    /// The active query.
    pub fn query(&self) -> TableQuery {
        self.query.read().clone()
    }

    pub fn set_search(&self, search: impl Into<String>) {
        self.query.write().set_search(search);
    }

    pub fn set_stage_filter(&self, filter: StageFilter) {
        self.query.write().set_stage_filter(filter);
    }

    /// Toggle sorting on a key: same key flips direction, a new key
    /// starts descending.
    pub fn toggle_sort(&self, key: SortKey) {
        self.query.write().toggle_sort(key);
    }

    /// Assemble the table from the store's current state and the
    /// active query.
    pub fn refresh(&self) -> TableSnapshot {
        self.refresh_at(Instant::now())
    }

    /// `refresh` with an explicit highlight clock, for deterministic
    /// callers.
    pub fn refresh_at(&self, now: Instant) -> TableSnapshot {
        let snapshot = self.store.snapshot();

        // Feed each generation pair to the tracker exactly once.
        let version = snapshot.version();
        if self.observed_version.swap(version, Ordering::AcqRel) != version {
            self.tracker.observe_snapshot(&snapshot, now);
        }

        let query = self.query.read().clone();
        let projected = project(snapshot.current(), &query);

        let rows: Vec<TableRow> = projected
            .into_iter()
            .map(|instrument| {
                let highlights = RowHighlights {
                    price: self
                        .tracker
                        .direction(&instrument.id, TrackedField::Price, now),
                    change_24h: self
                        .tracker
                        .direction(&instrument.id, TrackedField::Change24h, now),
                };
                TableRow {
                    instrument,
                    highlights,
                }
            })
            .collect();

        debug!(version, rows = rows.len(), "assembled table snapshot");

        TableSnapshot {
            totals: TableTotals::compute(snapshot.current()),
            rows,
            version,
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
        }
    }
}
