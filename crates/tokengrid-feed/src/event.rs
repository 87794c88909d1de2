//! Feed event wire type and boundary validation.
//!
//! One event per tracked instrument per tick. Malformed events are
//! rejected here, at the boundary, and never reach the store.

use crate::error::{FeedError, FeedResult};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tokengrid_core::{InstrumentId, Price, HISTORY_LEN};
use tokengrid_store::InstrumentUpdate;

/// A single instrument update as delivered by the market feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedEvent {
    pub id: InstrumentId,
    pub price: Price,
    pub change_24h: Decimal,
    /// Price window as seen by the feed, oldest first.
    pub history: Vec<Price>,
}

impl FeedEvent {
    /// Validate the event against the wire contract.
    ///
    /// - `price` must be strictly positive
    /// - `change_24h` must lie within [-1, 1]
    /// - `history` must be exactly the window length
    pub fn validate(&self) -> FeedResult<()> {
        if !self.price.is_positive() {
            return Err(FeedError::InvalidEvent(format!(
                "non-positive price {} for {}",
                self.price, self.id
            )));
        }
        if self.change_24h < dec!(-1) || self.change_24h > dec!(1) {
            return Err(FeedError::InvalidEvent(format!(
                "change_24h {} out of [-1, 1] for {}",
                self.change_24h, self.id
            )));
        }
        if self.history.len() != HISTORY_LEN {
            return Err(FeedError::InvalidEvent(format!(
                "history length {} for {}",
                self.history.len(),
                self.id
            )));
        }
        Ok(())
    }

    /// Convert into a store-level partial update.
    ///
    /// The store maintains its own history window from the price, so
    /// the event's window is only used for validation.
    pub fn into_update(self) -> InstrumentUpdate {
        InstrumentUpdate {
            id: self.id,
            price: Some(self.price),
            change_24h: Some(self.change_24h),
        }
    }
}
