//! Active query state: search text, stage filter, sort spec.
//!
//! Unknown sort keys and stage filters are rejected here, at the
//! query boundary, so the projection engine itself never sees them.

use crate::error::ProjectError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tokengrid_core::{Instrument, Stage};

/// Sortable numeric field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    MarketCap,
    Price,
    Volume24h,
    Change24h,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MarketCap => write!(f, "market_cap"),
            Self::Price => write!(f, "price"),
            Self::Volume24h => write!(f, "volume_24h"),
            Self::Change24h => write!(f, "change_24h"),
        }
    }
}

impl FromStr for SortKey {
    type Err = ProjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "market_cap" => Ok(Self::MarketCap),
            "price" => Ok(Self::Price),
            "volume_24h" => Ok(Self::Volume24h),
            "change_24h" => Ok(Self::Change24h),
            other => Err(ProjectError::UnknownSortKey(other.to_string())),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    #[must_use]
    pub fn flipped(&self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Active sort: key plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

/// Stage filter: everything, or exactly one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageFilter {
    #[default]
    All,
    Only(Stage),
}

impl StageFilter {
    /// Whether an instrument passes this filter.
    pub fn matches(&self, instrument: &Instrument) -> bool {
        match self {
            Self::All => true,
            Self::Only(stage) => instrument.stage == *stage,
        }
    }
}

impl FromStr for StageFilter {
    type Err = ProjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(Self::All);
        }
        s.parse::<Stage>()
            .map(Self::Only)
            .map_err(|_| ProjectError::UnknownStageFilter(s.to_string()))
    }
}

/// The query the projection is computed against.
///
/// Changing any field re-triggers projection; the query itself never
/// touches instrument state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableQuery {
    /// Case-insensitive substring matched against name or symbol.
    /// Empty text keeps everything.
    pub search: String,
    pub stage_filter: StageFilter,
    /// No sort spec preserves the post-filter input order.
    pub sort: Option<SortSpec>,
}

impl TableQuery {
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    pub fn set_stage_filter(&mut self, filter: StageFilter) {
        self.stage_filter = filter;
    }

    /// Toggle sorting on a key.
    ///
    /// Toggling the key already active flips the direction; selecting
    /// a new key always starts descending.
    pub fn toggle_sort(&mut self, key: SortKey) {
        let direction = match self.sort {
            Some(spec) if spec.key == key => spec.direction.flipped(),
            _ => SortDirection::Descending,
        };
        self.sort = Some(SortSpec { key, direction });
    }
}
