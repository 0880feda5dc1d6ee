//! OpenMusic Cache
//!
//! Two-tier key/value cache that never fails its caller.
//!
//! ```text
//! ResilientCache            <- health-tracking decorator, public API
//!   ├── RemoteStore (trait)  <- shared cache, e.g. RedisStore
//!   └── LocalCache           <- in-process LRU with per-entry TTL
//! ```
//!
//! - **Writes**: always land in the local map; the remote write is best-effort
//! - **Reads**: go to the remote only while it is marked healthy; any remote
//!   error marks it degraded and the read falls through to the local map
//! - **Fills**: cache-aside readers take a [`FillToken`] before reading the
//!   source of truth; a fill that raced a delete of the same key is discarded
//! - **Recovery**: degraded -> healthy only after a successful connect + PING
//!   (see [`ResilientCache::probe`] and [`ResilientCache::spawn_health_probe`])
//!
//! The cache is a disposable derived view. Losing it entirely costs latency,
//! never correctness.

mod error;
mod invalidation;
mod local;
mod remote;
mod resilient;

pub use error::{CacheError, CacheResult};
pub use invalidation::FillToken;
pub use local::LocalCache;
pub use remote::{RedisStore, RemoteStore};
pub use resilient::{CacheHealth, ResilientCache};
