use crate::feed::error::FeedError;
use crate::library::error::LibraryError;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ServiceError {
    #[error("FeedError: {0}")]
    FeedError(#[from] FeedError),

    #[error("LibraryError: {0}")]
    LibraryError(#[from] LibraryError),
}
