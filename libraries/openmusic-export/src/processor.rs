/// Turns one queued export job into a sent email
use crate::mail::{validate_email, ExportMail, MailTransport};
use async_trait::async_trait;
use openmusic_core::{ExportJob, PlaylistExport, PlaylistId};

/// Where the worker reads playlist state from
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Current playlist and songs, `None` if the playlist is gone
    async fn load_snapshot(&self, playlist_id: &PlaylistId) -> openmusic_core::Result<Option<PlaylistExport>>;

    /// Explicit target email, else the requester's stored address
    async fn resolve_recipient(&self, job: &ExportJob) -> openmusic_core::Result<Option<String>>;
}

/// Result of processing one delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Mail accepted by the relay
    Delivered,
    /// Transient failure; worth one more attempt
    Retry(String),
    /// Can never succeed; goes straight to the dead-letter queue
    DeadLetter(String),
}

pub const ATTACHMENT_NAME: &str = "playlists.json";

pub struct ExportProcessor<S, M> {
    source: S,
    mailer: M,
}

impl<S: SnapshotSource, M: MailTransport> ExportProcessor<S, M> {
    pub fn new(source: S, mailer: M) -> Self {
        Self { source, mailer }
    }

    /// Process a raw queue payload
    ///
    /// Playlist state is read at processing time, so the email reflects the
    /// playlist as it is now rather than when the export was requested.
    pub async fn process(&self, payload: &[u8]) -> Outcome {
        let job = match ExportJob::from_bytes(payload) {
            Ok(job) => job,
            Err(e) => {
                tracing::warn!(error = %e, "Malformed export job");
                return Outcome::DeadLetter(format!("malformed payload: {}", e));
            }
        };

        let outcome = self.process_job(&job).await;
        match &outcome {
            Outcome::Delivered => {
                tracing::info!(playlist_id = %job.playlist_id, requester_id = %job.requester_id, "Export delivered");
            }
            Outcome::Retry(reason) => {
                tracing::warn!(playlist_id = %job.playlist_id, reason, "Export failed, retryable");
            }
            Outcome::DeadLetter(reason) => {
                tracing::error!(playlist_id = %job.playlist_id, reason, "Export failed permanently");
            }
        }
        outcome
    }

    async fn process_job(&self, job: &ExportJob) -> Outcome {
        let snapshot = match self.source.load_snapshot(&job.playlist_id).await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => return Outcome::DeadLetter("playlist no longer exists".into()),
            Err(e) => return Outcome::Retry(format!("loading playlist: {}", e)),
        };

        let recipient = match self.source.resolve_recipient(job).await {
            Ok(Some(recipient)) => recipient,
            Ok(None) => return Outcome::DeadLetter("no recipient address".into()),
            Err(e) => return Outcome::Retry(format!("resolving recipient: {}", e)),
        };
        if let Err(e) = validate_email(&recipient) {
            return Outcome::DeadLetter(e.to_string());
        }

        let attachment = match snapshot.to_attachment() {
            Ok(bytes) => bytes,
            Err(e) => return Outcome::DeadLetter(format!("rendering attachment: {}", e)),
        };

        let mail = ExportMail {
            to: recipient,
            subject: format!("Playlist export: {}", snapshot.playlist.name),
            body: format!(
                "Your export of \"{}\" ({} songs) is attached.",
                snapshot.playlist.name,
                snapshot.playlist.songs.len()
            ),
            attachment_name: ATTACHMENT_NAME.to_string(),
            attachment,
        };

        match self.mailer.send(mail).await {
            Ok(()) => Outcome::Delivered,
            Err(e) if e.is_permanent() => Outcome::DeadLetter(e.to_string()),
            Err(e) => Outcome::Retry(e.to_string()),
        }
    }
}
