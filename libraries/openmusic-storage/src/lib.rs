//! OpenMusic Storage
//!
//! `SQLite` relational store adapter for the playlist core.
//!
//! The store is the single source of truth: every uniqueness rule
//! (song-in-playlist, collaborator, album like) is enforced here by a
//! `UNIQUE` constraint, and every multi-row mutation runs in one transaction.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: Each table family owns its own queries
//! - **Transactions**: Mutations that touch more than one table take a
//!   transaction and commit once; an early return drops (rolls back) it
//! - **No Authorization**: Callers resolve roles with [`access::resolve_role`]
//!   before mutating
//!
//! # Example
//!
//! ```rust,no_run
//! use openmusic_storage::{create_pool, run_migrations};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://openmusic.db").await?;
//! run_migrations(&pool).await?;
//!
//! let playlists = openmusic_storage::playlists::get_for_user(&pool, &"user-1".into()).await?;
//! # Ok(())
//! # }
//! ```

// Vertical slices
pub mod access;
pub mod activities;
pub mod album_likes;
pub mod catalog;
pub mod collaborations;
pub mod exports;
pub mod playlist_songs;
pub mod playlists;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://openmusic.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(database_url, "Creating SQLite pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::debug!("SQLite pool created");

    Ok(pool)
}

/// Fixed-width UTC timestamp so text ordering matches time ordering
pub(crate) fn now_timestamp() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.6fZ")
        .to_string()
}
