//! Fixed-length sliding window of past price samples.
//!
//! Every instrument carries exactly `HISTORY_LEN` samples, oldest
//! first. Merges slide the window: evict the oldest sample, append
//! the new price. The length never changes after construction.

use crate::decimal::Price;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};

/// Number of samples in every price history window.
pub const HISTORY_LEN: usize = 7;

/// Ordered fixed-length price window, oldest sample first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Price>", into = "Vec<Price>")]
pub struct PriceHistory {
    samples: Vec<Price>,
}

impl PriceHistory {
    /// Build a window from exactly `HISTORY_LEN` samples.
    pub fn from_samples(samples: Vec<Price>) -> Result<Self, CoreError> {
        if samples.len() != HISTORY_LEN {
            return Err(CoreError::InvalidHistory(format!(
                "expected {} samples, got {}",
                HISTORY_LEN,
                samples.len()
            )));
        }
        Ok(Self { samples })
    }

    /// Fill the whole window with one price (used for fresh instruments).
    pub fn filled(price: Price) -> Self {
        Self {
            samples: vec![price; HISTORY_LEN],
        }
    }

    /// Produce a new window with the oldest sample evicted and
    /// `price` appended. The receiver is left untouched.
    #[must_use]
    pub fn pushed(&self, price: Price) -> Self {
        let mut samples = Vec::with_capacity(HISTORY_LEN);
        samples.extend_from_slice(&self.samples[1..]);
        samples.push(price);
        Self { samples }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Price] {
        &self.samples
    }

    /// Oldest sample in the window.
    pub fn oldest(&self) -> Price {
        self.samples[0]
    }

    /// Most recent sample in the window.
    pub fn latest(&self) -> Price {
        self.samples[HISTORY_LEN - 1]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Price> {
        self.samples.iter()
    }
}

impl TryFrom<Vec<Price>> for PriceHistory {
    type Error = CoreError;

    fn try_from(samples: Vec<Price>) -> Result<Self, Self::Error> {
        Self::from_samples(samples)
    }
}

impl From<PriceHistory> for Vec<Price> {
    fn from(history: PriceHistory) -> Self {
        history.samples
    }
}
