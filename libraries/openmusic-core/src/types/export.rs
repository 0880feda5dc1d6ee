/// Export pipeline wire types
///
/// `ExportJob` is the only thing the server and the export worker exchange.
/// It travels as UTF-8 JSON with camelCase keys:
/// `{"playlistId": "...", "targetEmail": "..."|null, "requesterId": "...", "timestamp": "<ISO-8601>"}`.
use crate::error::Result;
use crate::types::{PlaylistId, SongSummary, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request to email a playlist snapshot
///
/// Not persisted. Delivery is at-least-once and the job carries no dedup id,
/// so processing it twice sends two emails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportJob {
    /// Playlist to export
    pub playlist_id: PlaylistId,
    /// Recipient; `None` means the requester's stored address
    pub target_email: Option<String>,
    /// Principal that requested the export
    pub requester_id: UserId,
    /// When the request was accepted
    pub timestamp: DateTime<Utc>,
}

impl ExportJob {
    /// Create a job stamped with the current time
    pub fn new(playlist_id: PlaylistId, requester_id: UserId, target_email: Option<String>) -> Self {
        Self {
            playlist_id,
            target_email,
            requester_id,
            timestamp: Utc::now(),
        }
    }

    /// Encode as the queue payload
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode a queue payload
    pub fn from_bytes(payload: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(payload)?)
    }
}

/// Playlist snapshot as emailed to the recipient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistExport {
    /// The exported playlist
    pub playlist: ExportedPlaylist,
}

/// Body of [`PlaylistExport`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedPlaylist {
    /// Playlist ID
    pub id: PlaylistId,
    /// Playlist name
    pub name: String,
    /// Current song listing
    pub songs: Vec<SongSummary>,
}

impl PlaylistExport {
    /// Render as the JSON attachment body
    pub fn to_attachment(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }
}
