/// Core error types for OpenMusic
use thiserror::Error;

/// Result type alias using `MusicError`
pub type Result<T> = std::result::Result<T, MusicError>;

/// Core error type for OpenMusic
///
/// The first five variants are the taxonomy the request layer maps to
/// user-visible statuses. `Database` and `Serialization` are internal
/// failures and are never shown to clients verbatim.
#[derive(Error, Debug)]
pub enum MusicError {
    /// Malformed or missing input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Entity not found
    #[error("{0}")]
    NotFound(String),

    /// Principal is not allowed to perform the operation
    #[error("{0}")]
    Forbidden(String),

    /// Uniqueness violation or duplicate operation
    #[error("{0}")]
    Conflict(String),

    /// A dependency (queue broker, mail relay) is unreachable
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Database errors (for storage implementations)
    #[error("Database error: {0}")]
    Database(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl MusicError {
    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a forbidden error
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Create an unavailable error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Replace a store-level uniqueness violation with a domain message
    ///
    /// Races between the existence check and the insert surface from the
    /// store as `Conflict`; callers use this to keep the message specific.
    #[must_use]
    pub fn with_conflict_message(self, msg: impl Into<String>) -> Self {
        match self {
            Self::Conflict(_) => Self::Conflict(msg.into()),
            other => other,
        }
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for MusicError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::Conflict(format!("Duplicate entry: {}", db.message()))
            }
            _ => Self::Database(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_message_is_replaced() {
        let err = MusicError::conflict("UNIQUE constraint failed").with_conflict_message("Song already in playlist");
        assert_eq!(err.to_string(), "Song already in playlist");
    }

    #[test]
    fn other_errors_keep_their_message() {
        let err = MusicError::not_found("Playlist not found").with_conflict_message("ignored");
        assert!(matches!(err, MusicError::NotFound(ref m) if m == "Playlist not found"));
    }
}
