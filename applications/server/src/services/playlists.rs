/// Mutation Engine for playlists and their songs
use super::access::{AccessResolver, PLAYLIST_NOT_FOUND};
use openmusic_core::{
    ActivityEntry, MusicError, PlaylistDetail, PlaylistId, PlaylistSummary, Result, SongId, UserId,
};
use openmusic_storage::{activities, catalog, playlist_songs, playlists};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct PlaylistService {
    pool: SqlitePool,
    access: AccessResolver,
}

impl PlaylistService {
    pub fn new(pool: SqlitePool, access: AccessResolver) -> Self {
        Self { pool, access }
    }

    pub async fn create_playlist(&self, name: &str, owner_id: &UserId) -> Result<PlaylistId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MusicError::invalid_argument("Playlist name must not be empty"));
        }
        if owner_id.is_blank() {
            return Err(MusicError::invalid_argument("Playlist owner must not be empty"));
        }
        if !catalog::user_exists(&self.pool, owner_id).await? {
            return Err(MusicError::not_found("User not found"));
        }

        let id = playlists::create(&self.pool, name, owner_id).await?;
        tracing::info!(playlist_id = %id, %owner_id, "Playlist created");
        Ok(id)
    }

    /// Delete a playlist with its songs, activities and collaborators
    pub async fn delete_playlist(&self, playlist_id: &PlaylistId, requester_id: &UserId) -> Result<PlaylistId> {
        self.access.resolve_owner(playlist_id, requester_id).await?;

        playlists::delete_cascade(&self.pool, playlist_id).await?;
        tracing::info!(%playlist_id, "Playlist deleted");
        Ok(playlist_id.clone())
    }

    /// Returns the new link's ID
    pub async fn add_song(&self, playlist_id: &PlaylistId, song_id: &SongId, user_id: &UserId) -> Result<String> {
        self.access.resolve_access(playlist_id, user_id).await?;
        self.ensure_song(song_id).await?;

        let link_id = playlist_songs::add(&self.pool, playlist_id, song_id, user_id).await?;
        tracing::debug!(%playlist_id, %song_id, %user_id, "Song added to playlist");
        Ok(link_id)
    }

    /// Returns the removed link's ID
    pub async fn remove_song(&self, playlist_id: &PlaylistId, song_id: &SongId, user_id: &UserId) -> Result<String> {
        self.access.resolve_access(playlist_id, user_id).await?;
        self.ensure_song(song_id).await?;

        let link_id = playlist_songs::remove(&self.pool, playlist_id, song_id, user_id).await?;
        tracing::debug!(%playlist_id, %song_id, %user_id, "Song removed from playlist");
        Ok(link_id)
    }

    /// Playlists the user owns or collaborates on
    pub async fn list_playlists(&self, user_id: &UserId) -> Result<Vec<PlaylistSummary>> {
        playlists::get_for_user(&self.pool, user_id).await
    }

    /// Playlist header and songs ordered by title
    pub async fn list_songs(&self, playlist_id: &PlaylistId, user_id: &UserId) -> Result<PlaylistDetail> {
        self.access.resolve_access(playlist_id, user_id).await?;

        // Deleted between the role lookup and this read
        playlists::get_detail(&self.pool, playlist_id)
            .await?
            .ok_or_else(|| MusicError::not_found(PLAYLIST_NOT_FOUND))
    }

    /// Activity trail, oldest first
    pub async fn list_activities(&self, playlist_id: &PlaylistId, user_id: &UserId) -> Result<Vec<ActivityEntry>> {
        self.access.resolve_access(playlist_id, user_id).await?;
        activities::list_for_playlist(&self.pool, playlist_id).await
    }

    async fn ensure_song(&self, song_id: &SongId) -> Result<()> {
        if song_id.is_blank() {
            return Err(MusicError::invalid_argument("songId must not be empty"));
        }
        if !catalog::song_exists(&self.pool, song_id).await? {
            return Err(MusicError::not_found("Song not found"));
        }
        Ok(())
    }
}
