//! Projection error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Unknown sort key: {0}")]
    UnknownSortKey(String),

    #[error("Unknown stage filter: {0}")]
    UnknownStageFilter(String),
}

pub type ProjectResult<T> = Result<T, ProjectError>;
