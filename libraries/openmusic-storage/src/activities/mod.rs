//! Append-only playlist activity records

use openmusic_core::{error::Result, types::*};
use sqlx::{Row, SqliteConnection, SqlitePool};

/// Append an activity record on the caller's connection
///
/// Takes a connection rather than the pool so the insert joins the
/// caller's transaction.
pub(crate) async fn append(
    conn: &mut SqliteConnection,
    playlist_id: &PlaylistId,
    song_id: &SongId,
    user_id: &UserId,
    action: ActivityAction,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO playlist_song_activities (id, playlist_id, song_id, user_id, action, time)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(generate_activity_id())
    .bind(playlist_id)
    .bind(song_id)
    .bind(user_id)
    .bind(action.as_str())
    .bind(crate::now_timestamp())
    .execute(conn)
    .await?;

    Ok(())
}

/// Activities for a playlist, oldest first
///
/// Records sharing a timestamp keep insertion order.
pub async fn list_for_playlist(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
) -> Result<Vec<ActivityEntry>> {
    let rows = sqlx::query(
        r#"
        SELECT
            COALESCE(u.username, pa.user_id) AS username,
            COALESCE(s.title, pa.song_id) AS title,
            pa.action,
            pa.time
        FROM playlist_song_activities pa
        LEFT JOIN users u ON u.id = pa.user_id
        LEFT JOIN songs s ON s.id = pa.song_id
        WHERE pa.playlist_id = ?
        ORDER BY pa.time ASC, pa.rowid ASC
        "#,
    )
    .bind(playlist_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .filter_map(|row| {
            let action: String = row.get("action");
            Some(ActivityEntry {
                username: row.get("username"),
                title: row.get("title"),
                action: ActivityAction::parse(&action)?,
                time: row.get("time"),
            })
        })
        .collect())
}
