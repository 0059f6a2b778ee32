use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tracing::info;

use crate::error::StoreError;
use crate::traits::AlertStore;

/// [`AlertStore`] backed by a Redis server.
///
/// Holds one multiplexed connection; every operation works on a cheap clone of it,
/// so the store can be shared across concurrently running alert tasks.
#[derive(Clone)]
pub struct RedisStore {
    conn: MultiplexedConnection,
}

impl RedisStore {
    pub async fn connect(connection_string: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(connection_string)?;
        let conn = client.get_multiplexed_async_connection().await?;
        info!("connected to redis");
        Ok(Self { conn })
    }
}

/// Millisecond TTL for `SET .. PX`. Sub-second TTLs survive; Redis rejects zero.
fn px_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}

#[async_trait]
impl AlertStore for RedisStore {
    async fn keys(&self, pattern: &str) -> Result<Vec<String>, StoreError> {
        let mut conn = self.conn.clone();
        let keys: Vec<String> = conn.keys(pattern).await?;
        Ok(keys)
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn multi_get(&self, keys: &[String]) -> Result<Vec<Option<String>>, StoreError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.conn.clone();
        // Explicit MGET so a single key still yields a one-element array.
        let values: Vec<Option<String>> = redis::cmd("MGET")
            .arg(keys)
            .query_async(&mut conn)
            .await?;
        Ok(values)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(key, value).await?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let mut conn = self.conn.clone();
        let exists: bool = conn.exists(key).await?;
        Ok(exists)
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key).await?;
        Ok(())
    }

    async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: () = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("PX")
            .arg(px_millis(ttl))
            .query_async(&mut conn)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn px_ttl_is_clamped() {
        assert_eq!(px_millis(Duration::from_secs(3_600)), 3_600_000);
        assert_eq!(px_millis(Duration::from_micros(250)), 1);
        assert_eq!(px_millis(Duration::ZERO), 1);
        assert_eq!(px_millis(Duration::MAX), u64::MAX);
    }
}
