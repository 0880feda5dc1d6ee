/// Playlist activity (audit trail) types
use serde::{Deserialize, Serialize};

/// Membership change recorded for a playlist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityAction {
    /// Song added to the playlist
    Add,
    /// Song removed from the playlist
    Delete,
}

impl ActivityAction {
    /// Convert action to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityAction::Add => "add",
            ActivityAction::Delete => "delete",
        }
    }

    /// Parse action from its stored string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "add" => Some(ActivityAction::Add),
            "delete" => Some(ActivityAction::Delete),
            _ => None,
        }
    }
}

/// Activity record joined with user and song names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// Username of the principal who made the change
    pub username: String,
    /// Title of the affected song
    pub title: String,
    /// What happened
    pub action: ActivityAction,
    /// ISO-8601 UTC timestamp
    pub time: String,
}
