//! Existence checks against the externally owned catalog tables

use openmusic_core::{error::Result, types::*};
use sqlx::{Row, SqlitePool};

/// Check that a song exists in the catalog
pub async fn song_exists(pool: &SqlitePool, song_id: &SongId) -> Result<bool> {
    let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM songs WHERE id = ?) AS found")
        .bind(song_id)
        .fetch_one(pool)
        .await?;

    Ok(row.get("found"))
}

/// Check that a user exists
pub async fn user_exists(pool: &SqlitePool, user_id: &UserId) -> Result<bool> {
    let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM users WHERE id = ?) AS found")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    Ok(row.get("found"))
}

/// Check that an album exists
pub async fn album_exists(pool: &SqlitePool, album_id: &AlbumId) -> Result<bool> {
    let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM albums WHERE id = ?) AS found")
        .bind(album_id)
        .fetch_one(pool)
        .await?;

    Ok(row.get("found"))
}

/// Get the email address stored for a user, if any
pub async fn user_email(pool: &SqlitePool, user_id: &UserId) -> Result<Option<String>> {
    let email = sqlx::query_scalar::<_, Option<String>>("SELECT email FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(email.flatten())
}
