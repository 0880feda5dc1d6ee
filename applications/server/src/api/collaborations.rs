/// Collaborations API routes
use crate::{error::Result, middleware::AuthenticatedUser, state::AppState};
use axum::{extract::State, http::StatusCode, Json};
use openmusic_core::{PlaylistId, UserId};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollaborationRequest {
    pub playlist_id: String,
    pub user_id: String,
}

/// POST /api/collaborations
/// Owner grants `userId` collaborator rights
pub async fn add_collaborator(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<CollaborationRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    let id = app_state
        .collaborations
        .add_collaborator(
            &PlaylistId::new(req.playlist_id),
            &UserId::new(req.user_id),
            auth.user_id(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "collaborationId": id }))))
}

/// DELETE /api/collaborations
pub async fn remove_collaborator(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<CollaborationRequest>,
) -> Result<Json<serde_json::Value>> {
    let id = app_state
        .collaborations
        .remove_collaborator(
            &PlaylistId::new(req.playlist_id),
            &UserId::new(req.user_id),
            auth.user_id(),
        )
        .await?;
    Ok(Json(json!({ "collaborationId": id })))
}
