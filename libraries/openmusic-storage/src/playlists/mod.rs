//! Playlist rows and the cascading delete

use openmusic_core::{error::Result, types::*, MusicError};
use sqlx::{Row, SqlitePool};

/// Insert a playlist and return its generated ID
pub async fn create(pool: &SqlitePool, name: &str, owner_id: &UserId) -> Result<PlaylistId> {
    let id = PlaylistId::generate();

    sqlx::query("INSERT INTO playlists (id, name, owner) VALUES (?, ?, ?)")
        .bind(&id)
        .bind(name)
        .bind(owner_id)
        .execute(pool)
        .await?;

    Ok(id)
}

/// Get playlist by ID
pub async fn get_by_id(pool: &SqlitePool, id: &PlaylistId) -> Result<Option<Playlist>> {
    let row = sqlx::query("SELECT id, name, owner FROM playlists WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|row| Playlist {
        id: row.get("id"),
        name: row.get("name"),
        owner_id: row.get("owner"),
    }))
}

/// Get playlists the user owns or collaborates on, ordered by name
pub async fn get_for_user(pool: &SqlitePool, user_id: &UserId) -> Result<Vec<PlaylistSummary>> {
    let rows = sqlx::query(
        r#"
        SELECT DISTINCT p.id, p.name, u.username
        FROM playlists p
        JOIN users u ON u.id = p.owner
        LEFT JOIN collaborations c ON c.playlist_id = p.id
        WHERE p.owner = ? OR c.user_id = ?
        ORDER BY p.name ASC, p.id ASC
        "#,
    )
    .bind(user_id)
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| PlaylistSummary {
            id: row.get("id"),
            name: row.get("name"),
            username: row.get("username"),
        })
        .collect())
}

/// Get playlist header and its songs ordered by title
pub async fn get_detail(pool: &SqlitePool, id: &PlaylistId) -> Result<Option<PlaylistDetail>> {
    let header = sqlx::query(
        r#"
        SELECT p.id, p.name, u.username
        FROM playlists p
        JOIN users u ON u.id = p.owner
        WHERE p.id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let Some(header) = header else {
        return Ok(None);
    };

    let songs = get_songs(pool, id).await?;

    Ok(Some(PlaylistDetail {
        id: header.get("id"),
        name: header.get("name"),
        username: header.get("username"),
        songs,
    }))
}

/// Songs linked to a playlist, ordered by title ascending
pub async fn get_songs(pool: &SqlitePool, id: &PlaylistId) -> Result<Vec<SongSummary>> {
    let rows = sqlx::query(
        r#"
        SELECT s.id, s.title, s.performer
        FROM playlist_song_links ps
        JOIN songs s ON s.id = ps.song_id
        WHERE ps.playlist_id = ?
        ORDER BY s.title ASC, s.id ASC
        "#,
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| SongSummary {
            id: row.get("id"),
            title: row.get("title"),
            performer: row.get("performer"),
        })
        .collect())
}

/// Delete a playlist and everything hanging off it
///
/// Activities, song links, and collaborations are removed before the
/// playlist row, all inside one transaction. Any failure rolls the whole
/// delete back.
pub async fn delete_cascade(pool: &SqlitePool, id: &PlaylistId) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM playlist_song_activities WHERE playlist_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM playlist_song_links WHERE playlist_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM collaborations WHERE playlist_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let deleted = sqlx::query("DELETE FROM playlists WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    if deleted.rows_affected() == 0 {
        // Dropping the transaction rolls back the child deletes
        return Err(MusicError::not_found("Playlist not found"));
    }

    tx.commit().await?;

    Ok(())
}
