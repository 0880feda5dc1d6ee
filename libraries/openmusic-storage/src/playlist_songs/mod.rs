//! Song membership of playlists
//!
//! Every link change is paired with an activity record in the same
//! transaction, so the audit trail never disagrees with membership.

use crate::activities;
use openmusic_core::{error::Result, types::*, MusicError};
use sqlx::{Row, SqlitePool};

const ALREADY_IN_PLAYLIST: &str = "Song is already in the playlist";

/// Link a song to a playlist and record the `add` activity
///
/// Fails with `Conflict` when the pair already exists, including when a
/// concurrent insert wins the race and the `UNIQUE` constraint fires.
pub async fn add(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
    song_id: &SongId,
    user_id: &UserId,
) -> Result<String> {
    let mut tx = pool.begin().await?;

    let existing = sqlx::query("SELECT id FROM playlist_song_links WHERE playlist_id = ? AND song_id = ?")
        .bind(playlist_id)
        .bind(song_id)
        .fetch_optional(&mut *tx)
        .await?;

    if existing.is_some() {
        return Err(MusicError::conflict(ALREADY_IN_PLAYLIST));
    }

    let link_id = generate_link_id();

    sqlx::query("INSERT INTO playlist_song_links (id, playlist_id, song_id) VALUES (?, ?, ?)")
        .bind(&link_id)
        .bind(playlist_id)
        .bind(song_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| MusicError::from(e).with_conflict_message(ALREADY_IN_PLAYLIST))?;

    activities::append(&mut *tx, playlist_id, song_id, user_id, ActivityAction::Add).await?;

    tx.commit().await?;

    Ok(link_id)
}

/// Unlink a song from a playlist and record the `delete` activity
pub async fn remove(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
    song_id: &SongId,
    user_id: &UserId,
) -> Result<String> {
    let mut tx = pool.begin().await?;

    let removed = sqlx::query(
        "DELETE FROM playlist_song_links WHERE playlist_id = ? AND song_id = ? RETURNING id",
    )
    .bind(playlist_id)
    .bind(song_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(removed) = removed else {
        return Err(MusicError::not_found("Song not found in this playlist"));
    };
    let link_id: String = removed.get("id");

    activities::append(&mut *tx, playlist_id, song_id, user_id, ActivityAction::Delete).await?;

    tx.commit().await?;

    Ok(link_id)
}
