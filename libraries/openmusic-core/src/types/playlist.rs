/// Playlist domain types
use crate::types::{PlaylistId, SongId, UserId};
use serde::{Deserialize, Serialize};

/// Playlist row
///
/// The owner is fixed at creation and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    /// Unique playlist identifier
    pub id: PlaylistId,

    /// Playlist name
    pub name: String,

    /// Owner user ID
    pub owner_id: UserId,
}

/// Role a principal holds on a playlist
///
/// Resolved once per operation from a single lookup; callers branch on the
/// variant instead of probing owner and collaborator separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaylistRole {
    /// Created the playlist; exclusive and permanent
    Owner,
    /// Holds a revocable grant to change song membership
    Collaborator,
    /// Neither owner nor collaborator
    None,
}

impl PlaylistRole {
    /// Classify a principal against the playlist owner and collaborator flag
    pub fn classify(owner_id: &UserId, principal: &UserId, is_collaborator: bool) -> Self {
        if owner_id == principal {
            Self::Owner
        } else if is_collaborator {
            Self::Collaborator
        } else {
            Self::None
        }
    }

    /// Read songs/activities and add or remove songs
    pub fn has_access(self) -> bool {
        matches!(self, Self::Owner | Self::Collaborator)
    }

    /// Delete the playlist and manage collaborators
    pub fn is_owner(self) -> bool {
        matches!(self, Self::Owner)
    }
}

/// Playlist as listed for a user (owned or shared)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    /// Playlist ID
    pub id: PlaylistId,
    /// Playlist name
    pub name: String,
    /// Owner's username
    pub username: String,
}

/// Song as it appears inside a playlist listing or export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongSummary {
    /// Song ID
    pub id: SongId,
    /// Song title
    pub title: String,
    /// Performer name
    pub performer: String,
}

/// Playlist with its songs, ordered by title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistDetail {
    /// Playlist ID
    pub id: PlaylistId,
    /// Playlist name
    pub name: String,
    /// Owner's username
    pub username: String,
    /// Songs ordered by title ascending
    pub songs: Vec<SongSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_wins_over_collaborator_flag() {
        let owner = UserId::new("user-1");
        assert_eq!(PlaylistRole::classify(&owner, &owner, true), PlaylistRole::Owner);
    }

    #[test]
    fn classification_covers_all_roles() {
        let owner = UserId::new("user-1");
        let other = UserId::new("user-2");

        let collaborator = PlaylistRole::classify(&owner, &other, true);
        assert_eq!(collaborator, PlaylistRole::Collaborator);
        assert!(collaborator.has_access());
        assert!(!collaborator.is_owner());

        let stranger = PlaylistRole::classify(&owner, &other, false);
        assert_eq!(stranger, PlaylistRole::None);
        assert!(!stranger.has_access());
    }
}
