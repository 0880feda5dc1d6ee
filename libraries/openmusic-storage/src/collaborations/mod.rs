//! Collaboration grants on playlists

use openmusic_core::{error::Result, types::*, MusicError};
use sqlx::{Row, SqlitePool};

const ALREADY_COLLABORATOR: &str = "User is already a collaborator on this playlist";

/// Grant a user collaborator rights on a playlist
pub async fn add(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
    user_id: &UserId,
) -> Result<CollaborationId> {
    if exists(pool, playlist_id, user_id).await? {
        return Err(MusicError::conflict(ALREADY_COLLABORATOR));
    }

    let id = CollaborationId::generate();

    sqlx::query("INSERT INTO collaborations (id, playlist_id, user_id) VALUES (?, ?, ?)")
        .bind(&id)
        .bind(playlist_id)
        .bind(user_id)
        .execute(pool)
        .await
        .map_err(|e| MusicError::from(e).with_conflict_message(ALREADY_COLLABORATOR))?;

    Ok(id)
}

/// Revoke a collaborator grant, returning the removed grant's ID
pub async fn remove(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
    user_id: &UserId,
) -> Result<CollaborationId> {
    let row = sqlx::query(
        "DELETE FROM collaborations WHERE playlist_id = ? AND user_id = ? RETURNING id",
    )
    .bind(playlist_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    row.map(|row| row.get("id"))
        .ok_or_else(|| MusicError::not_found("Collaborator not found on this playlist"))
}

/// Check whether a user collaborates on a playlist
pub async fn exists(pool: &SqlitePool, playlist_id: &PlaylistId, user_id: &UserId) -> Result<bool> {
    let row = sqlx::query(
        "SELECT EXISTS(SELECT 1 FROM collaborations WHERE playlist_id = ? AND user_id = ?) AS found",
    )
    .bind(playlist_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(row.get("found"))
}
