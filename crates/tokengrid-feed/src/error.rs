//! Feed error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Invalid feed event: {0}")]
    InvalidEvent(String),

    #[error(transparent)]
    Store(#[from] tokengrid_store::StoreError),
}

pub type FeedResult<T> = Result<T, FeedError>;
