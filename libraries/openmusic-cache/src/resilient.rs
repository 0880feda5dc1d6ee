/// Health-tracking composition of a remote store and the local fallback
use crate::{
    error::CacheError,
    invalidation::{FillToken, Invalidations},
    local::LocalCache,
    remote::RemoteStore,
};
use serde::Serialize;
use std::num::NonZeroUsize;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Observable state of the remote tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheHealth {
    /// Remote reachable; reads go to it
    Healthy,
    /// Remote configured but failing; reads and writes use the local map
    Degraded,
    /// No remote configured
    LocalOnly,
}

/// Cache that never raises to its caller
///
/// `get` returns `None` on any miss or failure, `set` and `delete` always
/// succeed locally. Remote failures are logged and flip the health signal.
///
/// Cache-aside readers should populate with [`begin_fill`](Self::begin_fill)
/// and [`fill`](Self::fill) rather than `set`, so that a value computed before
/// a concurrent `delete` never outlives that delete.
pub struct ResilientCache {
    remote: Option<Arc<dyn RemoteStore>>,
    local: LocalCache,
    invalidations: Invalidations,
    health: watch::Sender<CacheHealth>,
}

impl ResilientCache {
    /// Cache with no remote tier
    pub fn local_only(capacity: NonZeroUsize) -> Self {
        let (health, _) = watch::channel(CacheHealth::LocalOnly);
        Self {
            remote: None,
            local: LocalCache::new(capacity),
            invalidations: Invalidations::new(capacity),
            health,
        }
    }

    /// Cache backed by `remote`
    ///
    /// Starts degraded; call [`probe`](Self::probe) to connect.
    pub fn with_remote(remote: Arc<dyn RemoteStore>, capacity: NonZeroUsize) -> Self {
        let (health, _) = watch::channel(CacheHealth::Degraded);
        Self {
            remote: Some(remote),
            local: LocalCache::new(capacity),
            invalidations: Invalidations::new(capacity),
            health,
        }
    }

    pub fn health(&self) -> CacheHealth {
        *self.health.borrow()
    }

    /// Subscribe to health transitions
    pub fn subscribe(&self) -> watch::Receiver<CacheHealth> {
        self.health.subscribe()
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        if let Some(remote) = self.healthy_remote() {
            match remote.get(key).await {
                Ok(value) => return value,
                Err(e) => self.mark_degraded("get", key, &e),
            }
        }

        self.local.get(key)
    }

    pub async fn set(&self, key: &str, value: &str, ttl: Duration) {
        self.local.set(key, value, ttl);

        if let Some(remote) = self.healthy_remote() {
            if let Err(e) = remote.set(key, value, ttl).await {
                self.mark_degraded("set", key, &e);
            }
        }
    }

    pub async fn delete(&self, key: &str) {
        self.invalidations.record_delete(key);
        self.local.delete(key);

        if let Some(remote) = self.healthy_remote() {
            if let Err(e) = remote.delete(key).await {
                // The remote may keep serving the old value until its TTL runs out
                self.mark_degraded("delete", key, &e);
            }
        }
    }

    /// Take before reading the value a later [`fill`](Self::fill) will store
    pub fn begin_fill(&self) -> FillToken {
        self.invalidations.token()
    }

    /// Store a value computed after `token` was taken
    ///
    /// Skipped if `key` was deleted since the token. A delete that lands while
    /// the write is in flight is replayed afterwards, so the stale value is
    /// removed again. Returns whether the value was kept.
    pub async fn fill(&self, key: &str, value: &str, ttl: Duration, token: FillToken) -> bool {
        if self.invalidations.deleted_since(key, token) {
            tracing::debug!(key, "Skipping fill invalidated before write");
            return false;
        }

        self.set(key, value, ttl).await;

        if self.invalidations.deleted_since(key, token) {
            tracing::debug!(key, "Fill raced an invalidation, deleting again");
            self.delete(key).await;
            return false;
        }
        true
    }

    /// Try to (re)connect the remote tier and update health accordingly
    pub async fn probe(&self) -> CacheHealth {
        let Some(remote) = &self.remote else {
            return CacheHealth::LocalOnly;
        };

        match remote.connect().await {
            Ok(()) => self.transition(CacheHealth::Healthy),
            Err(e) => {
                tracing::debug!(error = %e, "Remote cache probe failed");
                self.transition(CacheHealth::Degraded);
            }
        }

        self.health()
    }

    /// Re-probe a degraded remote every `every` until the cache is dropped
    pub fn spawn_health_probe(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let cache: Weak<Self> = Arc::downgrade(self);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                let Some(cache) = cache.upgrade() else {
                    break;
                };
                if cache.health() == CacheHealth::Degraded {
                    cache.probe().await;
                }
            }
        })
    }

    fn healthy_remote(&self) -> Option<&Arc<dyn RemoteStore>> {
        if self.health() == CacheHealth::Healthy {
            self.remote.as_ref()
        } else {
            None
        }
    }

    fn mark_degraded(&self, op: &str, key: &str, err: &CacheError) {
        tracing::warn!(op, key, error = %err, "Remote cache failed, using local fallback");
        self.transition(CacheHealth::Degraded);
    }

    fn transition(&self, next: CacheHealth) {
        let changed = self.health.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });

        if changed {
            match next {
                CacheHealth::Healthy => tracing::info!("Remote cache healthy"),
                CacheHealth::Degraded => tracing::warn!("Remote cache degraded"),
                CacheHealth::LocalOnly => {}
            }
        }
    }
}
