//! Common test utilities and fixtures
//!
//! Databases are real SQLite files in a temp directory with migrations
//! applied, so constraints and transactions behave as in production.
#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use openmusic_cache::{CacheError, CacheResult, RemoteStore, ResilientCache};
use openmusic_core::{types::*, ExportJob};
use openmusic_export::{JobPublisher, QueueError};
use openmusic_server::{services::AuthService, AppState};
use parking_lot::Mutex;
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::Notify;

pub const JWT_SECRET: &str = "test-secret-key";

/// Test database wrapper that cleans up on drop
pub struct TestDb {
    pub pool: SqlitePool,
    _temp_dir: TempDir,
}

impl TestDb {
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_url = format!("sqlite://{}", temp_dir.path().join("test.db").display());

        let pool = openmusic_storage::create_pool(&db_url)
            .await
            .expect("Failed to create pool");
        openmusic_storage::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        Self {
            pool,
            _temp_dir: temp_dir,
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Test fixtures inserted directly, bypassing the service layer
pub mod fixtures {
    use super::*;

    pub async fn create_user(pool: &SqlitePool, username: &str) -> UserId {
        let id = UserId::new(format!("user-{}", username));
        sqlx::query("INSERT INTO users (id, username, fullname, email) VALUES (?, ?, ?, ?)")
            .bind(&id)
            .bind(username)
            .bind(username)
            .bind(format!("{}@example.com", username))
            .execute(pool)
            .await
            .expect("Failed to create user");
        id
    }

    pub async fn create_song(pool: &SqlitePool, title: &str) -> SongId {
        let id = SongId::generate();
        sqlx::query("INSERT INTO songs (id, title, year, performer) VALUES (?, ?, 2021, 'Test Band')")
            .bind(&id)
            .bind(title)
            .execute(pool)
            .await
            .expect("Failed to create song");
        id
    }

    pub async fn create_album(pool: &SqlitePool, name: &str) -> AlbumId {
        let id = AlbumId::generate();
        sqlx::query("INSERT INTO albums (id, name, year) VALUES (?, ?, 2021)")
            .bind(&id)
            .bind(name)
            .execute(pool)
            .await
            .expect("Failed to create album");
        id
    }

    pub async fn count_links(pool: &SqlitePool, playlist_id: &PlaylistId) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM playlist_song_links WHERE playlist_id = ?")
            .bind(playlist_id)
            .fetch_one(pool)
            .await
            .expect("Failed to count links")
    }
}

/// Publisher double that records every job
#[derive(Default)]
pub struct RecordingPublisher {
    pub jobs: Mutex<Vec<ExportJob>>,
}

impl RecordingPublisher {
    pub fn published(&self) -> Vec<ExportJob> {
        self.jobs.lock().clone()
    }
}

#[async_trait]
impl JobPublisher for RecordingPublisher {
    async fn publish(&self, job: &ExportJob) -> Result<(), QueueError> {
        self.jobs.lock().push(job.clone());
        Ok(())
    }
}

/// Publisher double for an unreachable broker
pub struct DownPublisher;

#[async_trait]
impl JobPublisher for DownPublisher {
    async fn publish(&self, _job: &ExportJob) -> Result<(), QueueError> {
        Err(QueueError::Timeout(Duration::from_millis(10)))
    }
}

/// Remote cache that fails every call
#[derive(Default)]
pub struct FailingRemote {
    pub calls: AtomicUsize,
}

impl FailingRemote {
    fn fail<T>(&self) -> CacheResult<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(CacheError::Backend("connection refused".to_string()))
    }
}

#[async_trait]
impl RemoteStore for FailingRemote {
    async fn connect(&self) -> CacheResult<()> {
        self.fail()
    }

    async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
        self.fail()
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> CacheResult<()> {
        self.fail()
    }

    async fn delete(&self, _key: &str) -> CacheResult<()> {
        self.fail()
    }
}

/// Healthy in-memory remote whose writes can be parked mid-flight
#[derive(Default)]
pub struct GatedRemote {
    pub data: Mutex<HashMap<String, String>>,
    hold_sets: AtomicBool,
    pub set_entered: Notify,
    pub set_release: Notify,
}

impl GatedRemote {
    pub fn hold_sets(&self, hold: bool) {
        self.hold_sets.store(hold, Ordering::SeqCst);
    }
}

#[async_trait]
impl RemoteStore for GatedRemote {
    async fn connect(&self) -> CacheResult<()> {
        Ok(())
    }

    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        Ok(self.data.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str, _ttl: Duration) -> CacheResult<()> {
        if self.hold_sets.load(Ordering::SeqCst) {
            self.set_entered.notify_one();
            self.set_release.notified().await;
        }
        self.data.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.data.lock().remove(key);
        Ok(())
    }
}

pub fn local_cache() -> Arc<ResilientCache> {
    Arc::new(ResilientCache::local_only(NonZeroUsize::new(128).unwrap()))
}

pub fn test_auth_service() -> Arc<AuthService> {
    Arc::new(AuthService::new(JWT_SECRET.to_string(), 1))
}

/// App state over `pool` with a local-only cache and the given publisher
pub fn test_state(pool: &SqlitePool, publisher: Arc<dyn JobPublisher>) -> AppState {
    AppState::new(pool.clone(), test_auth_service(), local_cache(), publisher)
}

/// Full router plus a state handle for assertions
pub fn test_app(pool: &SqlitePool, publisher: Arc<dyn JobPublisher>) -> (Router, AppState) {
    let state = test_state(pool, publisher);
    (openmusic_server::create_router(state.clone()), state)
}

pub fn bearer(user_id: &UserId) -> String {
    let token = test_auth_service()
        .create_access_token(user_id)
        .expect("Failed to create token");
    format!("Bearer {}", token)
}
