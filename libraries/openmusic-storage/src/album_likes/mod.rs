//! Album like records and their count

use openmusic_core::{error::Result, types::*, MusicError};
use sqlx::{Row, SqlitePool};

const ALREADY_LIKED: &str = "User already liked this album";

/// Record that a user likes an album
pub async fn like(pool: &SqlitePool, album_id: &AlbumId, user_id: &UserId) -> Result<()> {
    if has_liked(pool, album_id, user_id).await? {
        return Err(MusicError::conflict(ALREADY_LIKED));
    }

    sqlx::query("INSERT INTO user_album_likes (id, album_id, user_id) VALUES (?, ?, ?)")
        .bind(generate_like_id())
        .bind(album_id)
        .bind(user_id)
        .execute(pool)
        .await
        .map_err(|e| MusicError::from(e).with_conflict_message(ALREADY_LIKED))?;

    Ok(())
}

/// Remove a user's like
pub async fn unlike(pool: &SqlitePool, album_id: &AlbumId, user_id: &UserId) -> Result<()> {
    let result = sqlx::query("DELETE FROM user_album_likes WHERE album_id = ? AND user_id = ?")
        .bind(album_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(MusicError::not_found("Like not found for this album"));
    }

    Ok(())
}

/// Check whether the user likes the album
pub async fn has_liked(pool: &SqlitePool, album_id: &AlbumId, user_id: &UserId) -> Result<bool> {
    let row = sqlx::query(
        "SELECT EXISTS(SELECT 1 FROM user_album_likes WHERE album_id = ? AND user_id = ?) AS found",
    )
    .bind(album_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(row.get("found"))
}

/// Count likes for an album
pub async fn count(pool: &SqlitePool, album_id: &AlbumId) -> Result<u64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_album_likes WHERE album_id = ?")
        .bind(album_id)
        .fetch_one(pool)
        .await?;

    Ok(count.unsigned_abs())
}
