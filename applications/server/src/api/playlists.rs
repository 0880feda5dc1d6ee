/// Playlists API routes
use crate::{error::Result, middleware::AuthenticatedUser, state::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use openmusic_core::{ActivityEntry, PlaylistDetail, PlaylistId, PlaylistSummary, SongId};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongRequest {
    pub song_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitiesResponse {
    pub playlist_id: PlaylistId,
    pub activities: Vec<ActivityEntry>,
}

/// GET /api/playlists
/// Playlists the authenticated user owns or collaborates on
pub async fn list_playlists(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<PlaylistSummary>>> {
    let playlists = app_state.playlists.list_playlists(auth.user_id()).await?;
    Ok(Json(playlists))
}

/// POST /api/playlists
pub async fn create_playlist(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<CreatePlaylistRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    let playlist_id = app_state
        .playlists
        .create_playlist(&req.name, auth.user_id())
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "playlistId": playlist_id }))))
}

/// DELETE /api/playlists/:id
/// Owner only
pub async fn delete_playlist(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<serde_json::Value>> {
    let playlist_id = app_state
        .playlists
        .delete_playlist(&PlaylistId::new(id), auth.user_id())
        .await?;
    Ok(Json(json!({ "playlistId": playlist_id })))
}

/// GET /api/playlists/:id/songs
pub async fn list_songs(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<PlaylistDetail>> {
    let detail = app_state
        .playlists
        .list_songs(&PlaylistId::new(id), auth.user_id())
        .await?;
    Ok(Json(detail))
}

/// POST /api/playlists/:id/songs
pub async fn add_song(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<SongRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    let link_id = app_state
        .playlists
        .add_song(&PlaylistId::new(id), &SongId::new(req.song_id), auth.user_id())
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": link_id }))))
}

/// DELETE /api/playlists/:id/songs
pub async fn remove_song(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<SongRequest>,
) -> Result<Json<serde_json::Value>> {
    let link_id = app_state
        .playlists
        .remove_song(&PlaylistId::new(id), &SongId::new(req.song_id), auth.user_id())
        .await?;
    Ok(Json(json!({ "id": link_id })))
}

/// GET /api/playlists/:id/activities
pub async fn list_activities(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<ActivitiesResponse>> {
    let playlist_id = PlaylistId::new(id);
    let activities = app_state
        .playlists
        .list_activities(&playlist_id, auth.user_id())
        .await?;
    Ok(Json(ActivitiesResponse {
        playlist_id,
        activities,
    }))
}
