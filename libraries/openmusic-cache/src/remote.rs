/// Remote (shared) cache backends
use crate::error::{CacheError, CacheResult};
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use std::future::Future;
use std::time::Duration;
use tokio::sync::RwLock;

/// Shared cache reachable over the network
///
/// Implementations report every failure; deciding what a failure means for
/// the caller is `ResilientCache`'s job.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// (Re)establish the connection and verify it with a round trip
    async fn connect(&self) -> CacheResult<()>;

    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;

    async fn delete(&self, key: &str) -> CacheResult<()>;
}

/// Redis-backed remote store
///
/// Holds one multiplexed connection. Every connect and command is bounded by
/// `timeout`, so a dead server costs at most that long per call.
pub struct RedisStore {
    client: redis::Client,
    connection: RwLock<Option<MultiplexedConnection>>,
    timeout: Duration,
}

impl RedisStore {
    pub fn new(url: &str, timeout: Duration) -> CacheResult<Self> {
        let client = redis::Client::open(url)?;
        Ok(Self {
            client,
            connection: RwLock::new(None),
            timeout,
        })
    }

    async fn connection(&self) -> CacheResult<MultiplexedConnection> {
        self.connection
            .read()
            .await
            .clone()
            .ok_or(CacheError::NotConnected)
    }

    async fn bounded<T, F>(&self, fut: F) -> CacheResult<T>
    where
        F: Future<Output = redis::RedisResult<T>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(CacheError::Timeout(self.timeout)),
        }
    }

    /// Drop the connection after a failure so the next probe reconnects
    async fn invalidate(&self) {
        self.connection.write().await.take();
    }

    async fn run<T, F, Fut>(&self, op: F) -> CacheResult<T>
    where
        F: FnOnce(MultiplexedConnection) -> Fut,
        Fut: Future<Output = redis::RedisResult<T>>,
    {
        let conn = self.connection().await?;
        let result = self.bounded(op(conn)).await;
        if result.is_err() {
            self.invalidate().await;
        }
        result
    }
}

#[async_trait]
impl RemoteStore for RedisStore {
    async fn connect(&self) -> CacheResult<()> {
        let mut conn = self
            .bounded(self.client.get_multiplexed_async_connection())
            .await?;

        let pong: String = self
            .bounded(redis::cmd("PING").query_async::<_, String>(&mut conn))
            .await?;
        if pong != "PONG" {
            return Err(CacheError::Backend(format!("unexpected PING reply: {}", pong)));
        }

        *self.connection.write().await = Some(conn);
        tracing::info!("Connected to Redis");
        Ok(())
    }

    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        self.run(|mut conn| async move {
            redis::cmd("GET")
                .arg(key)
                .query_async::<_, Option<String>>(&mut conn)
                .await
        })
        .await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let seconds = ttl.as_secs().max(1);
        self.run(|mut conn| async move {
            redis::cmd("SET")
                .arg(key)
                .arg(value)
                .arg("EX")
                .arg(seconds)
                .query_async::<_, ()>(&mut conn)
                .await
        })
        .await
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.run(|mut conn| async move {
            redis::cmd("DEL")
                .arg(key)
                .query_async::<_, ()>(&mut conn)
                .await
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn commands_before_connect_fail_fast() {
        let store = RedisStore::new("redis://127.0.0.1:6379", Duration::from_millis(50)).unwrap();
        assert!(matches!(store.get("k").await, Err(CacheError::NotConnected)));
        assert!(matches!(store.delete("k").await, Err(CacheError::NotConnected)));
    }

    #[test]
    fn invalid_url_is_rejected() {
        assert!(RedisStore::new("not a url", Duration::from_millis(50)).is_err());
    }
}
