/// Export API routes
use crate::{error::Result, middleware::AuthenticatedUser, state::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use openmusic_core::PlaylistId;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub target_email: Option<String>,
}

/// POST /api/export/playlists/:id
/// Accepts the export and returns before any mail is sent
pub async fn export_playlist(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<ExportRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    app_state
        .exports
        .request_export(&PlaylistId::new(id), auth.user_id(), req.target_email)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Your export request is being processed" })),
    ))
}
