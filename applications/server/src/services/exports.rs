/// Export Producer
use super::access::AccessResolver;
use openmusic_core::{ExportJob, MusicError, PlaylistId, Result, UserId};
use openmusic_export::{validate_email, JobPublisher, LinkState};
use std::sync::Arc;

#[derive(Clone)]
pub struct ExportService {
    access: AccessResolver,
    publisher: Arc<dyn JobPublisher>,
}

impl ExportService {
    pub fn new(access: AccessResolver, publisher: Arc<dyn JobPublisher>) -> Self {
        Self { access, publisher }
    }

    pub fn link_state(&self) -> Option<LinkState> {
        self.publisher.link_state()
    }

    /// Queue an export of the playlist and return without waiting for it
    ///
    /// Fails with `Unavailable` when the job cannot be handed to the queue;
    /// an accepted request is never dropped on this side.
    pub async fn request_export(
        &self,
        playlist_id: &PlaylistId,
        requester_id: &UserId,
        target_email: Option<String>,
    ) -> Result<ExportJob> {
        self.access.resolve_access(playlist_id, requester_id).await?;

        let target_email = target_email
            .map(|email| email.trim().to_string())
            .filter(|email| !email.is_empty());
        if let Some(email) = &target_email {
            validate_email(email).map_err(|e| MusicError::invalid_argument(e.to_string()))?;
        }

        let job = ExportJob::new(playlist_id.clone(), requester_id.clone(), target_email);
        self.publisher.publish(&job).await.map_err(|e| {
            tracing::error!(%playlist_id, error = %e, "Failed to queue export");
            MusicError::unavailable("Export queue is unavailable, try again later")
        })?;

        tracing::info!(%playlist_id, %requester_id, "Export queued");
        Ok(job)
    }
}
