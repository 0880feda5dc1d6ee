/// Health check API routes
use crate::state::AppState;
use axum::{extract::State, Json};
use openmusic_cache::CacheHealth;
use openmusic_export::LinkState;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub cache: CacheHealth,
    /// Export broker link, `null` when no broker is configured
    pub export: Option<LinkState>,
}

/// GET /api/health - Health check endpoint
///
/// A degraded cache still reports `ok`: results stay correct, only slower.
pub async fn health(State(app_state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        cache: app_state.cache.health(),
        export: app_state.exports.link_state(),
    })
}
