/// Per-key invalidation clock for cache fills
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;

/// Snapshot of the invalidation clock taken before reading the source of truth
///
/// A fill carrying a token is discarded if its key was deleted after the
/// token was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillToken {
    epoch: u64,
}

struct Clock {
    now: u64,
    deleted_at: LruCache<String, u64>,
    /// Newest tick among keys pushed out of `deleted_at`
    forgotten: u64,
}

/// Records when each key was last deleted
///
/// Bounded: once a key's tick is evicted, fills that started before the
/// eviction are treated as invalidated.
pub(crate) struct Invalidations {
    clock: Mutex<Clock>,
}

impl Invalidations {
    pub(crate) fn new(capacity: NonZeroUsize) -> Self {
        Self {
            clock: Mutex::new(Clock {
                now: 0,
                deleted_at: LruCache::new(capacity),
                forgotten: 0,
            }),
        }
    }

    pub(crate) fn token(&self) -> FillToken {
        FillToken {
            epoch: self.clock.lock().now,
        }
    }

    pub(crate) fn record_delete(&self, key: &str) {
        let mut clock = self.clock.lock();
        clock.now += 1;
        let tick = clock.now;

        if let Some((evicted, at)) = clock.deleted_at.push(key.to_string(), tick) {
            if evicted != key {
                clock.forgotten = clock.forgotten.max(at);
            }
        }
    }

    pub(crate) fn deleted_since(&self, key: &str, token: FillToken) -> bool {
        let clock = self.clock.lock();
        clock.forgotten > token.epoch
            || clock
                .deleted_at
                .peek(key)
                .is_some_and(|at| *at > token.epoch)
    }
}
