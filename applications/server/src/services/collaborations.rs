/// Collaboration Management
use super::access::AccessResolver;
use openmusic_core::{CollaborationId, MusicError, PlaylistId, Result, UserId};
use openmusic_storage::{catalog, collaborations};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct CollaborationService {
    pool: SqlitePool,
    access: AccessResolver,
}

impl CollaborationService {
    pub fn new(pool: SqlitePool, access: AccessResolver) -> Self {
        Self { pool, access }
    }

    pub async fn add_collaborator(
        &self,
        playlist_id: &PlaylistId,
        target_user_id: &UserId,
        requester_id: &UserId,
    ) -> Result<CollaborationId> {
        self.access.resolve_owner(playlist_id, requester_id).await?;
        self.ensure_user(target_user_id).await?;

        let id = collaborations::add(&self.pool, playlist_id, target_user_id).await?;
        tracing::info!(%playlist_id, user_id = %target_user_id, "Collaborator added");
        Ok(id)
    }

    pub async fn remove_collaborator(
        &self,
        playlist_id: &PlaylistId,
        target_user_id: &UserId,
        requester_id: &UserId,
    ) -> Result<CollaborationId> {
        self.access.resolve_owner(playlist_id, requester_id).await?;
        self.ensure_user(target_user_id).await?;

        let id = collaborations::remove(&self.pool, playlist_id, target_user_id).await?;
        tracing::info!(%playlist_id, user_id = %target_user_id, "Collaborator removed");
        Ok(id)
    }

    async fn ensure_user(&self, user_id: &UserId) -> Result<()> {
        if user_id.is_blank() {
            return Err(MusicError::invalid_argument("userId must not be empty"));
        }
        if !catalog::user_exists(&self.pool, user_id).await? {
            return Err(MusicError::not_found("User not found"));
        }
        Ok(())
    }
}
