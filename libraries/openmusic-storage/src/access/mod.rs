//! Role lookup for playlist authorization

use openmusic_core::{error::Result, types::*};
use sqlx::{Row, SqlitePool};

/// Resolve the principal's role on a playlist in a single query
///
/// Returns `None` when the playlist does not exist.
pub async fn resolve_role(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
    user_id: &UserId,
) -> Result<Option<PlaylistRole>> {
    let row = sqlx::query(
        r#"
        SELECT
            p.owner,
            EXISTS(
                SELECT 1 FROM collaborations c
                WHERE c.playlist_id = p.id AND c.user_id = ?
            ) AS is_collaborator
        FROM playlists p
        WHERE p.id = ?
        "#,
    )
    .bind(user_id)
    .bind(playlist_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| {
        let owner: UserId = row.get("owner");
        let is_collaborator: bool = row.get("is_collaborator");
        PlaylistRole::classify(&owner, user_id, is_collaborator)
    }))
}
