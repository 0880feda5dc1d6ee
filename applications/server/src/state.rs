/// Shared application state
use crate::services::{
    AccessResolver, AlbumLikesService, AuthService, CollaborationService, ExportService, PlaylistService,
};
use openmusic_cache::ResilientCache;
use openmusic_export::JobPublisher;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub cache: Arc<ResilientCache>,
    pub playlists: Arc<PlaylistService>,
    pub collaborations: Arc<CollaborationService>,
    pub album_likes: Arc<AlbumLikesService>,
    pub exports: Arc<ExportService>,
}

impl AppState {
    pub fn new(
        pool: SqlitePool,
        auth_service: Arc<AuthService>,
        cache: Arc<ResilientCache>,
        publisher: Arc<dyn JobPublisher>,
    ) -> Self {
        let access = AccessResolver::new(pool.clone());

        Self {
            auth_service,
            playlists: Arc::new(PlaylistService::new(pool.clone(), access.clone())),
            collaborations: Arc::new(CollaborationService::new(pool.clone(), access.clone())),
            album_likes: Arc::new(AlbumLikesService::new(pool, Arc::clone(&cache))),
            exports: Arc::new(ExportService::new(access, publisher)),
            cache,
        }
    }
}
