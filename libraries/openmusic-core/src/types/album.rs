/// Album like aggregate
use serde::{Deserialize, Serialize};

/// Number of likes for an album and where the number came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikesCount {
    /// Count of like records for the album
    pub count: u64,
    /// Whether the value was served from the cache
    pub from_cache: bool,
}

impl LikesCount {
    /// Value served from the cache
    pub fn cached(count: u64) -> Self {
        Self {
            count,
            from_cache: true,
        }
    }

    /// Value computed from the store
    pub fn computed(count: u64) -> Self {
        Self {
            count,
            from_cache: false,
        }
    }
}
