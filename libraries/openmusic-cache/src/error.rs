/// Cache backend errors
///
/// These stay inside the crate: `ResilientCache` logs them and degrades
/// instead of returning them.
use thiserror::Error;

/// Result type alias using `CacheError`
pub type CacheResult<T> = std::result::Result<T, CacheError>;

#[derive(Error, Debug)]
pub enum CacheError {
    /// No live connection to the remote store
    #[error("Remote cache is not connected")]
    NotConnected,

    /// Connect or command exceeded its time budget
    #[error("Remote cache timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Error reported by the Redis client
    #[error(transparent)]
    Redis(#[from] redis::RedisError),

    /// Any other backend failure
    #[error("Remote cache error: {0}")]
    Backend(String),
}
