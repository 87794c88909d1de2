//! Core domain types for the tokengrid market table engine.
//!
//! This crate provides the fundamental types used throughout the system:
//! - `InstrumentId`, `Instrument`: a tracked instrument and its identity
//! - `Stage`: lifecycle stage enumeration (closed set)
//! - `Price`, `Amount`: precision-safe numeric types
//! - `PriceHistory`: fixed-length sliding window of past prices
//! - formatting utilities for currency and compact numbers

pub mod decimal;
pub mod error;
pub mod format;
pub mod history;
pub mod instrument;

pub use decimal::{Amount, Price};
pub use error::{CoreError, Result};
pub use format::{format_compact, format_currency, format_percent};
pub use history::{PriceHistory, HISTORY_LEN};
pub use instrument::{Instrument, InstrumentId, Stage};
