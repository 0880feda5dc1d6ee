//! OpenMusic Core
//!
//! Shared domain types and error handling for the OpenMusic services.
//!
//! This crate provides the building blocks used by both the request-serving
//! server and the export worker, which share no memory and only agree on
//! these types and the queue wire format.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Identifiers**: `PlaylistId`, `SongId`, `UserId`, `AlbumId`
//! - **Domain Types**: `Playlist`, `PlaylistRole`, `ActivityAction`, `LikesCount`
//! - **Wire Types**: `ExportJob` (the durable-queue message) and `PlaylistExport`
//! - **Error Handling**: Unified `MusicError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use openmusic_core::types::{ExportJob, PlaylistId, UserId};
//!
//! let job = ExportJob::new(
//!     PlaylistId::new("playlist-1"),
//!     UserId::new("user-1"),
//!     Some("listener@example.com".to_string()),
//! );
//! let bytes = job.to_bytes().unwrap();
//! assert_eq!(ExportJob::from_bytes(&bytes).unwrap().playlist_id, job.playlist_id);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{MusicError, Result};

pub use types::{
    ActivityAction, ActivityEntry, AlbumId, CollaborationId, ExportJob, ExportedPlaylist,
    LikesCount, Playlist, PlaylistDetail, PlaylistExport, PlaylistId, PlaylistRole,
    PlaylistSummary, SongId, SongSummary, UserId,
};
