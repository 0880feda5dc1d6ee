/// Aggregate Counter for album likes (cache-aside)
use openmusic_cache::ResilientCache;
use openmusic_core::{AlbumId, LikesCount, MusicError, Result, UserId};
use openmusic_storage::{album_likes, catalog};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;

/// How long a computed count may be served from the cache
pub const LIKES_TTL: Duration = Duration::from_secs(1800);

pub fn likes_key(album_id: &AlbumId) -> String {
    format!("album:likes:{}", album_id)
}

#[derive(Clone)]
pub struct AlbumLikesService {
    pool: SqlitePool,
    cache: Arc<ResilientCache>,
}

impl AlbumLikesService {
    pub fn new(pool: SqlitePool, cache: Arc<ResilientCache>) -> Self {
        Self { pool, cache }
    }

    pub async fn likes_count(&self, album_id: &AlbumId) -> Result<LikesCount> {
        self.ensure_album(album_id).await?;
        let key = likes_key(album_id);

        if let Some(cached) = self.cache.get(&key).await {
            match cached.parse::<u64>() {
                Ok(count) => return Ok(LikesCount::cached(count)),
                Err(_) => {
                    tracing::warn!(%key, value = %cached, "Discarding unparseable cached count");
                    self.cache.delete(&key).await;
                }
            }
        }

        // Taken before counting so a like that commits meanwhile wins
        let token = self.cache.begin_fill();
        let count = album_likes::count(&self.pool, album_id).await?;
        self.cache.fill(&key, &count.to_string(), LIKES_TTL, token).await;
        Ok(LikesCount::computed(count))
    }

    pub async fn like_album(&self, album_id: &AlbumId, user_id: &UserId) -> Result<()> {
        self.ensure_album(album_id).await?;

        album_likes::like(&self.pool, album_id, user_id).await?;
        self.cache.delete(&likes_key(album_id)).await;
        tracing::debug!(%album_id, %user_id, "Album liked");
        Ok(())
    }

    pub async fn unlike_album(&self, album_id: &AlbumId, user_id: &UserId) -> Result<()> {
        self.ensure_album(album_id).await?;

        album_likes::unlike(&self.pool, album_id, user_id).await?;
        self.cache.delete(&likes_key(album_id)).await;
        tracing::debug!(%album_id, %user_id, "Album unliked");
        Ok(())
    }

    async fn ensure_album(&self, album_id: &AlbumId) -> Result<()> {
        if !catalog::album_exists(&self.pool, album_id).await? {
            return Err(MusicError::not_found("Album not found"));
        }
        Ok(())
    }
}
