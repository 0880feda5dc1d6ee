/// Service layer
pub mod access;
pub mod album_likes;
pub mod auth;
pub mod collaborations;
pub mod exports;
pub mod playlists;

pub use access::AccessResolver;
pub use album_likes::AlbumLikesService;
pub use auth::AuthService;
pub use collaborations::CollaborationService;
pub use exports::ExportService;
pub use playlists::PlaylistService;
