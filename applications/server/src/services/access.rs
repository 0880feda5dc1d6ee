/// Authorization Resolver
///
/// Turns the single role lookup from the store into the two checks the
/// rest of the service layer needs.
use openmusic_core::{MusicError, PlaylistId, PlaylistRole, Result, UserId};
use sqlx::SqlitePool;

pub const PLAYLIST_NOT_FOUND: &str = "Playlist not found";

#[derive(Clone)]
pub struct AccessResolver {
    pool: SqlitePool,
}

impl AccessResolver {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn role(&self, playlist_id: &PlaylistId, user_id: &UserId) -> Result<PlaylistRole> {
        openmusic_storage::access::resolve_role(&self.pool, playlist_id, user_id)
            .await?
            .ok_or_else(|| MusicError::not_found(PLAYLIST_NOT_FOUND))
    }

    /// Owner or collaborator; enough to read and change song membership
    pub async fn resolve_access(&self, playlist_id: &PlaylistId, user_id: &UserId) -> Result<PlaylistRole> {
        let role = self.role(playlist_id, user_id).await?;
        if !role.has_access() {
            tracing::debug!(%playlist_id, %user_id, "Access denied");
            return Err(MusicError::forbidden("You are not allowed to access this playlist"));
        }
        Ok(role)
    }

    /// Owner only; collaborators are rejected too
    pub async fn resolve_owner(&self, playlist_id: &PlaylistId, user_id: &UserId) -> Result<()> {
        let role = self.role(playlist_id, user_id).await?;
        if !role.is_owner() {
            tracing::debug!(%playlist_id, %user_id, ?role, "Owner check failed");
            return Err(MusicError::forbidden("Only the playlist owner can do this"));
        }
        Ok(())
    }
}
