/// ID types for OpenMusic entities
///
/// All identifiers are opaque strings. Generated IDs carry an entity prefix
/// (`playlist-…`, `collab-…`) so they stay recognisable in logs and queue
/// payloads.
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[cfg(feature = "sqlx-support")]
use sqlx::{
    encode::IsNull,
    error::BoxDynError,
    sqlite::{SqliteArgumentValue, SqliteTypeInfo, SqliteValueRef},
    Decode, Encode, Sqlite, Type,
};

/// Random 16-character suffix for generated IDs
fn random_suffix() -> String {
    let mut simple = Uuid::new_v4().simple().to_string();
    simple.truncate(16);
    simple
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing identifier
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a new random identifier
            pub fn generate() -> Self {
                Self(format!("{}-{}", $prefix, random_suffix()))
            }

            /// Get the inner string
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the identifier is empty or whitespace
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        #[cfg(feature = "sqlx-support")]
        impl Type<Sqlite> for $name {
            fn type_info() -> SqliteTypeInfo {
                <String as Type<Sqlite>>::type_info()
            }
        }

        #[cfg(feature = "sqlx-support")]
        impl<'q> Encode<'q, Sqlite> for $name {
            fn encode_by_ref(
                &self,
                args: &mut Vec<SqliteArgumentValue<'q>>,
            ) -> Result<IsNull, BoxDynError> {
                <String as Encode<Sqlite>>::encode_by_ref(&self.0, args)
            }
        }

        #[cfg(feature = "sqlx-support")]
        impl<'r> Decode<'r, Sqlite> for $name {
            fn decode(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
                let s = <String as Decode<Sqlite>>::decode(value)?;
                Ok($name(s))
            }
        }
    };
}

string_id!(
    /// User identifier (issued by the external user service)
    UserId,
    "user"
);

string_id!(
    /// Playlist identifier
    PlaylistId,
    "playlist"
);

string_id!(
    /// Song identifier (owned by the external catalog)
    SongId,
    "song"
);

string_id!(
    /// Album identifier (owned by the external catalog)
    AlbumId,
    "album"
);

string_id!(
    /// Collaboration grant identifier
    CollaborationId,
    "collab"
);

/// Identifier for a playlist/song link row
pub fn generate_link_id() -> String {
    format!("ps-{}", random_suffix())
}

/// Identifier for an activity record row
pub fn generate_activity_id() -> String {
    format!("act-{}", random_suffix())
}

/// Identifier for an album like row
pub fn generate_like_id() -> String {
    format!("like-{}", random_suffix())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique_and_prefixed() {
        let id1 = PlaylistId::generate();
        let id2 = PlaylistId::generate();
        assert_ne!(id1, id2);
        assert!(id1.as_str().starts_with("playlist-"));
        assert_eq!(id1.as_str().len(), "playlist-".len() + 16);
    }

    #[test]
    fn song_id_from_string() {
        let id = SongId::new("song-123");
        assert_eq!(id.as_str(), "song-123");
    }

    #[test]
    fn blank_ids_are_detected() {
        assert!(UserId::new("  ").is_blank());
        assert!(!UserId::new("user-1").is_blank());
    }

    #[test]
    fn ids_serialize_transparently() {
        let id = AlbumId::new("album-9");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"album-9\"");
    }
}
