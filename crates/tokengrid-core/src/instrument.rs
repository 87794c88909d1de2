//! Tracked instrument and its lifecycle stage.
//!
//! An `Instrument` is a value: merges never mutate one in place.
//! `with_update` produces a fresh value with the replaced fields,
//! so concurrent readers holding an older generation never observe
//! a half-updated instrument.

use crate::decimal::{Amount, Price};
use crate::error::CoreError;
use crate::history::PriceHistory;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable unique instrument identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstrumentId(String);

impl InstrumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstrumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for InstrumentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for InstrumentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Lifecycle stage of a tracked instrument.
///
/// Closed set, fixed at instrument creation. Unknown values are
/// rejected at the boundary, never coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    NewPairs,
    FinalStretch,
    Migrated,
}

impl Stage {
    /// All valid stages, in display order.
    pub const ALL: [Stage; 3] = [Stage::NewPairs, Stage::FinalStretch, Stage::Migrated];
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NewPairs => write!(f, "New pairs"),
            Self::FinalStretch => write!(f, "Final Stretch"),
            Self::Migrated => write!(f, "Migrated"),
        }
    }
}

impl FromStr for Stage {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new_pairs" => Ok(Self::NewPairs),
            "final_stretch" => Ok(Self::FinalStretch),
            "migrated" => Ok(Self::Migrated),
            other => Err(CoreError::InvalidStage(other.to_string())),
        }
    }
}

/// A tracked instrument: display identity, pricing, and descriptive
/// fields.
///
/// `id`, the display identity, the descriptive amounts, and `stage`
/// are immutable for the instrument's lifetime; only `price`,
/// `change_24h`, and `history` have an update path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    /// Stable unique identifier.
    pub id: InstrumentId,
    /// Display name.
    pub name: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Emoji or image URL.
    pub icon: String,
    /// Current price, always strictly positive.
    pub price: Price,
    /// 24h change as a signed proportion (0.05 = +5%), not a percentage.
    pub change_24h: Decimal,
    /// Market capitalization.
    pub market_cap: Amount,
    /// 24h traded volume.
    pub volume_24h: Amount,
    /// Available liquidity.
    pub liquidity: Amount,
    /// Holder count.
    pub holders: u64,
    /// 24h transaction count.
    pub transactions_24h: u64,
    /// Lifecycle stage.
    pub stage: Stage,
    /// Sliding window of past prices, oldest first.
    pub history: PriceHistory,
}

impl Instrument {
    /// Produce a new instrument value with the given fields replaced.
    ///
    /// A new price is floored at `Price::FLOOR` and appended to the
    /// history window (evicting the oldest sample). Fields passed as
    /// `None` are carried over unchanged.
    #[must_use]
    pub fn with_update(&self, price: Option<Price>, change_24h: Option<Decimal>) -> Self {
        let mut next = self.clone();
        if let Some(price) = price {
            let price = price.floored();
            next.history = next.history.pushed(price);
            next.price = price;
        }
        if let Some(change) = change_24h {
            next.change_24h = change;
        }
        next
    }
}
