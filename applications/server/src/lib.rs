//! OpenMusic Server Library
//!
//! Request layer and service layer of the playlist service: authorization,
//! playlist mutations, collaborations, cached album like counts and the
//! producer side of the export pipeline.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use api::create_router;
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use services::AuthService;
pub use state::AppState;
