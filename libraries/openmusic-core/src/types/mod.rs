mod activity;
mod album;
mod export;
mod ids;
mod playlist;

pub use activity::{ActivityAction, ActivityEntry};
pub use album::LikesCount;
pub use export::{ExportJob, ExportedPlaylist, PlaylistExport};
pub use ids::{
    generate_activity_id, generate_like_id, generate_link_id, AlbumId, CollaborationId,
    PlaylistId, SongId, UserId,
};
pub use playlist::{Playlist, PlaylistDetail, PlaylistRole, PlaylistSummary, SongSummary};
