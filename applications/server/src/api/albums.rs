/// Album likes API routes
use crate::{error::Result, middleware::AuthenticatedUser, state::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use openmusic_core::AlbumId;
use serde_json::json;

/// Reports whether a count came from the cache or the database
pub const DATA_SOURCE_HEADER: &str = "x-data-source";

/// GET /api/albums/:id/likes
pub async fn likes_count(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    _auth: AuthenticatedUser,
) -> Result<([(&'static str, &'static str); 1], Json<serde_json::Value>)> {
    let likes = app_state.album_likes.likes_count(&AlbumId::new(id)).await?;
    let source = if likes.from_cache { "cache" } else { "database" };
    Ok((
        [(DATA_SOURCE_HEADER, source)],
        Json(json!({ "likes": likes.count })),
    ))
}

/// POST /api/albums/:id/likes
pub async fn like_album(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    app_state
        .album_likes
        .like_album(&AlbumId::new(id), auth.user_id())
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "message": "Album liked" }))))
}

/// DELETE /api/albums/:id/likes
pub async fn unlike_album(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<serde_json::Value>> {
    app_state
        .album_likes
        .unlike_album(&AlbumId::new(id), auth.user_id())
        .await?;
    Ok(Json(json!({ "message": "Album unliked" })))
}
