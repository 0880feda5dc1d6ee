/// Database-backed playlist snapshots for export jobs
use async_trait::async_trait;
use openmusic_core::{ExportJob, PlaylistExport, PlaylistId, Result};
use openmusic_export::SnapshotSource;
use sqlx::SqlitePool;

pub struct StoreSnapshots {
    pool: SqlitePool,
}

impl StoreSnapshots {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SnapshotSource for StoreSnapshots {
    async fn load_snapshot(&self, playlist_id: &PlaylistId) -> Result<Option<PlaylistExport>> {
        openmusic_storage::exports::load_snapshot(&self.pool, playlist_id).await
    }

    async fn resolve_recipient(&self, job: &ExportJob) -> Result<Option<String>> {
        openmusic_storage::exports::resolve_recipient(&self.pool, job).await
    }
}
