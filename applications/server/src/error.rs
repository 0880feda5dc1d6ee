/// Server error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use openmusic_core::MusicError;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error(transparent)]
    Domain(#[from] MusicError),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

impl ServerError {
    /// Status and client-facing message for this error
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ServerError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            ServerError::Domain(e) => match e {
                MusicError::InvalidArgument(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                MusicError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
                MusicError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
                MusicError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
                MusicError::Unavailable(msg) => {
                    tracing::warn!("Dependency unavailable: {}", msg);
                    (StatusCode::SERVICE_UNAVAILABLE, msg.clone())
                }
                MusicError::Database(msg) => {
                    tracing::error!("Database error: {}", msg);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Database error".to_string(),
                    )
                }
                MusicError::Serialization(e) => {
                    tracing::error!("Serialization error: {:?}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error".to_string(),
                    )
                }
            },
            ServerError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ServerError::Config(msg) => {
                tracing::error!("Config error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Configuration error".to_string(),
                )
            }
            ServerError::Jwt(e) => {
                tracing::warn!("JWT error: {:?}", e);
                (StatusCode::UNAUTHORIZED, "Invalid token".to_string())
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_message) = self.status_and_message();

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(err: impl Into<ServerError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn domain_errors_map_to_statuses() {
        assert_eq!(status(MusicError::invalid_argument("x")), StatusCode::BAD_REQUEST);
        assert_eq!(status(MusicError::not_found("x")), StatusCode::NOT_FOUND);
        assert_eq!(status(MusicError::forbidden("x")), StatusCode::FORBIDDEN);
        assert_eq!(status(MusicError::conflict("x")), StatusCode::CONFLICT);
        assert_eq!(status(MusicError::unavailable("x")), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            status(MusicError::Database("disk I/O".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_details_are_not_leaked() {
        let (_, message) = ServerError::from(MusicError::Database("secret table".into())).status_and_message();
        assert_eq!(message, "Database error");
    }
}
