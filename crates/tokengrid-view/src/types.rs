//! Row and snapshot types handed to renderers.

use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tokengrid_core::{format_currency, format_percent, Amount, Instrument};
use tokengrid_highlight::Direction;

/// Per-row highlight state at snapshot time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowHighlights {
    pub price: Option<Direction>,
    pub change_24h: Option<Direction>,
}

impl RowHighlights {
    pub fn is_empty(&self) -> bool {
        self.price.is_none() && self.change_24h.is_none()
    }
}

/// One table row: the instrument plus its active highlights.
#[derive(Debug, Clone)]
pub struct TableRow {
    pub instrument: Arc<Instrument>,
    pub highlights: RowHighlights,
}

/// Flat, serializable rendition of one row with display-formatted
/// monetary fields.
#[derive(Debug, Clone, Serialize)]
pub struct RowSnapshot {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub icon: String,
    pub price: String,
    pub change_24h: String,
    pub market_cap: String,
    pub volume_24h: String,
    pub liquidity: String,
    pub holders: u64,
    pub transactions_24h: u64,
    pub stage: String,
    pub history: Vec<Decimal>,
    pub price_highlight: Option<Direction>,
    pub change_24h_highlight: Option<Direction>,
}

impl From<&TableRow> for RowSnapshot {
    fn from(row: &TableRow) -> Self {
        let inst = &row.instrument;
        Self {
            id: inst.id.as_str().to_string(),
            name: inst.name.clone(),
            symbol: inst.symbol.clone(),
            icon: inst.icon.clone(),
            price: format_currency(inst.price.inner()),
            change_24h: format_percent(inst.change_24h),
            market_cap: format_currency(inst.market_cap.inner()),
            volume_24h: format_currency(inst.volume_24h.inner()),
            liquidity: format_currency(inst.liquidity.inner()),
            holders: inst.holders,
            transactions_24h: inst.transactions_24h,
            stage: inst.stage.to_string(),
            history: inst.history.as_slice().iter().map(|p| p.inner()).collect(),
            price_highlight: row.highlights.price,
            change_24h_highlight: row.highlights.change_24h,
        }
    }
}

/// Header totals, computed over the full instrument set regardless
/// of the active filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableTotals {
    pub instruments: usize,
    pub market_cap: Amount,
    pub volume_24h: Amount,
}

impl TableTotals {
    pub(crate) fn compute(instruments: &[Arc<Instrument>]) -> Self {
        let market_cap = instruments
            .iter()
            .fold(Decimal::ZERO, |sum, inst| sum + inst.market_cap.inner());
        let volume_24h = instruments
            .iter()
            .fold(Decimal::ZERO, |sum, inst| sum + inst.volume_24h.inner());
        Self {
            instruments: instruments.len(),
            market_cap: Amount::new(market_cap),
            volume_24h: Amount::new(volume_24h),
        }
    }
}

/// The fully assembled table at one point in logical time.
#[derive(Debug, Clone)]
pub struct TableSnapshot {
    /// Filtered, sorted rows in render order.
    pub rows: Vec<TableRow>,
    pub totals: TableTotals,
    /// Store version this snapshot was assembled from.
    pub version: u64,
    /// Wall-clock assembly time, unix milliseconds.
    pub timestamp_ms: i64,
}

impl TableSnapshot {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
