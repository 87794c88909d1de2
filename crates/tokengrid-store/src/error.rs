//! Store error types.

use thiserror::Error;
use tokengrid_core::InstrumentId;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Duplicate instrument id in seed: {0}")]
    DuplicateInstrument(InstrumentId),

    #[error("Empty instrument seed")]
    EmptySeed,

    /// A merge produced a state that violates a store invariant
    /// (non-positive price, history length drift). This is an
    /// internal-consistency fault, not an expected external failure.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
