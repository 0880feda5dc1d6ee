//! Playlist snapshots for the export worker

use crate::{catalog, playlists};
use openmusic_core::{error::Result, types::*};
use sqlx::{Row, SqlitePool};

/// Load the current state of a playlist for export
///
/// Returns `None` when the playlist has been deleted since the job was queued.
pub async fn load_snapshot(pool: &SqlitePool, playlist_id: &PlaylistId) -> Result<Option<PlaylistExport>> {
    let header = sqlx::query("SELECT id, name FROM playlists WHERE id = ?")
        .bind(playlist_id)
        .fetch_optional(pool)
        .await?;

    let Some(header) = header else {
        return Ok(None);
    };

    let songs = playlists::get_songs(pool, playlist_id).await?;

    Ok(Some(PlaylistExport {
        playlist: ExportedPlaylist {
            id: header.get("id"),
            name: header.get("name"),
            songs,
        },
    }))
}

/// Resolve who receives an export: the explicit target or the requester's email
pub async fn resolve_recipient(pool: &SqlitePool, job: &ExportJob) -> Result<Option<String>> {
    match &job.target_email {
        Some(email) => Ok(Some(email.clone())),
        None => catalog::user_email(pool, &job.requester_id).await,
    }
}
