//! Main application orchestration.
//!
//! Coordinates all components:
//! - instrument store seeded from config or the demo catalog
//! - simulated feed applying one batch per tick
//! - highlight tracker plus its eviction sweeper
//! - table view refreshed on every store version bump

use crate::config::AppConfig;
use crate::error::AppResult;
use std::sync::Arc;
use std::time::Duration;
use tokengrid_core::{format_currency, format_percent};
use tokengrid_feed::{demo_catalog, spawn_feed, FeedAdapterConfig, SimulatedFeed};
use tokengrid_highlight::{spawn_sweeper, HighlightConfig, HighlightTracker};
use tokengrid_store::InstrumentStore;
use tokengrid_view::{TableSnapshot, TableView};
use tracing::{debug, info};

/// Main application.
pub struct Application {
    config: AppConfig,
    store: Arc<InstrumentStore>,
    tracker: Arc<HighlightTracker>,
    view: TableView,
}

impl Application {
    /// Create a new application from loaded configuration.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let catalog = config
            .catalog
            .clone()
            .unwrap_or_else(demo_catalog);
        info!(instruments = catalog.len(), "Seeding instrument store");

        let store = Arc::new(InstrumentStore::new(catalog)?);
        let tracker = Arc::new(HighlightTracker::new(HighlightConfig {
            duration: Duration::from_millis(config.highlight.duration_ms),
        }));
        let view = TableView::new(store.clone(), tracker.clone());

        Ok(Self {
            config,
            store,
            tracker,
            view,
        })
    }

    /// Run the main application loop until ctrl-c.
    pub async fn run(&self) -> AppResult<()> {
        let seed_snapshot = self.store.snapshot();
        let catalog: Vec<_> = seed_snapshot
            .current()
            .iter()
            .map(|inst| inst.as_ref().clone())
            .collect();
        let producer = match self.config.feed.seed {
            Some(seed) => SimulatedFeed::with_seed(&catalog, seed),
            None => SimulatedFeed::new(&catalog),
        };

        let feed = spawn_feed(
            self.store.clone(),
            producer,
            FeedAdapterConfig {
                tick_interval_ms: self.config.feed.tick_interval_ms,
            },
        );
        let sweeper = spawn_sweeper(
            self.tracker.clone(),
            Duration::from_millis(self.config.highlight.sweep_interval_ms),
        );

        let mut version_rx = self.store.subscribe();

        // Render the seed state once before the first tick lands.
        log_snapshot(&self.view.refresh());

        info!("Entering main event loop");
        loop {
            tokio::select! {
                changed = version_rx.changed() => {
                    if changed.is_err() {
                        // Store dropped; nothing left to render.
                        break;
                    }
                    let snapshot = self.view.refresh();
                    log_snapshot(&snapshot);
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        feed.stop();
        sweeper.stop();
        feed.join().await;
        let _ = sweeper.join().await;

        info!(version = self.store.version(), "Shutting down");
        Ok(())
    }
}

/// Log the assembled table, one row per instrument.
fn log_snapshot(snapshot: &TableSnapshot) {
    info!(
        version = snapshot.version,
        rows = snapshot.len(),
        instruments = snapshot.totals.instruments,
        total_market_cap = %format_currency(snapshot.totals.market_cap.inner()),
        total_volume_24h = %format_currency(snapshot.totals.volume_24h.inner()),
        "Table updated"
    );

    for row in &snapshot.rows {
        let inst = &row.instrument;
        debug!(
            id = %inst.id,
            symbol = %inst.symbol,
            price = %format_currency(inst.price.inner()),
            change_24h = %format_percent(inst.change_24h),
            market_cap = %format_currency(inst.market_cap.inner()),
            stage = %inst.stage,
            price_highlight = ?row.highlights.price,
            change_highlight = ?row.highlights.change_24h,
            "Row"
        );
    }
}
