//! In-process [`AlertStore`] with emulated key expiry.
//!
//! Expiry is checked lazily on read against [`tokio::time::Instant`], so
//! tests can drive TTLs with paused time.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::error::StoreError;
use crate::traits::AlertStore;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| now < at)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remaining time to live of `key`, or `None` if it is missing or has no expiry.
    pub async fn ttl(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        let entries = self.entries.lock().await;
        entries
            .get(key)
            .filter(|e| e.is_live(now))
            .and_then(|e| e.expires_at)
            .map(|at| at.saturating_duration_since(now))
    }

    /// Number of live keys.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let entries = self.entries.lock().await;
        entries.values().filter(|e| e.is_live(now)).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Glob match supporting `*` wildcards.
fn glob_match(pattern: &str, key: &str) -> bool {
    let mut parts = pattern.split('*');
    let Some(first) = parts.next() else {
        return key.is_empty();
    };
    let Some(mut rest) = key.strip_prefix(first) else {
        return false;
    };
    let remaining: Vec<&str> = parts.collect();
    let Some((last, middle)) = remaining.split_last() else {
        // No wildcard at all.
        return rest.is_empty();
    };
    for part in middle {
        match rest.find(part) {
            Some(pos) => rest = &rest[pos + part.len()..],
            None => return false,
        }
    }
    rest.ends_with(last)
}

#[async_trait]
impl AlertStore for MemoryStore {
    async fn keys(&self, pattern: &str) -> Result<Vec<String>, StoreError> {
        let now = Instant::now();
        let entries = self.entries.lock().await;
        let mut keys: Vec<String> = entries
            .iter()
            .filter(|(k, e)| e.is_live(now) && glob_match(pattern, k))
            .map(|(k, _)| k.clone())
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let now = Instant::now();
        let entries = self.entries.lock().await;
        Ok(entries
            .get(key)
            .filter(|e| e.is_live(now))
            .map(|e| e.value.clone()))
    }

    async fn multi_get(&self, keys: &[String]) -> Result<Vec<Option<String>>, StoreError> {
        let now = Instant::now();
        let entries = self.entries.lock().await;
        Ok(keys
            .iter()
            .map(|k| {
                entries
                    .get(k)
                    .filter(|e| e.is_live(now))
                    .map(|e| e.value.clone())
            })
            .collect())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: None,
            },
        );
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let now = Instant::now();
        let entries = self.entries.lock().await;
        Ok(entries.get(key).is_some_and(|e| e.is_live(now)))
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        entries.remove(key);
        Ok(())
    }

    async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Some(Instant::now() + ttl),
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glob_matching() {
        assert!(glob_match("alert.*", "alert.abc"));
        assert!(glob_match("alert.*", "alert.abc.cooldown"));
        assert!(!glob_match("alert.*", "session.abc"));
        assert!(glob_match("alert.*.cooldown", "alert.abc.cooldown"));
        assert!(!glob_match("alert.*.cooldown", "alert.abc"));
        assert!(glob_match("exact", "exact"));
        assert!(!glob_match("exact", "exactly"));
        assert!(glob_match("*", "anything"));
    }

    #[tokio::test]
    async fn set_get_delete() {
        let store = MemoryStore::new();
        store.set("alert.1", "{}").await.unwrap();
        assert_eq!(store.get("alert.1").await.unwrap().as_deref(), Some("{}"));
        assert!(store.exists("alert.1").await.unwrap());

        store.delete("alert.1").await.unwrap();
        assert!(store.get("alert.1").await.unwrap().is_none());
        assert!(!store.exists("alert.1").await.unwrap());
        // Deleting a missing key is not an error.
        store.delete("alert.1").await.unwrap();
    }

    #[tokio::test]
    async fn multi_get_preserves_order_and_gaps() {
        let store = MemoryStore::new();
        store.set("a", "1").await.unwrap();
        store.set("c", "3").await.unwrap();
        let keys = vec!["c".to_string(), "b".to_string(), "a".to_string()];
        let values = store.multi_get(&keys).await.unwrap();
        assert_eq!(values, vec![Some("3".to_string()), None, Some("1".to_string())]);
    }

    #[tokio::test]
    async fn keys_filters_by_pattern() {
        let store = MemoryStore::new();
        store.set("alert.b", "x").await.unwrap();
        store.set("alert.a", "x").await.unwrap();
        store.set("other", "x").await.unwrap();
        let keys = store.keys("alert.*").await.unwrap();
        assert_eq!(keys, vec!["alert.a".to_string(), "alert.b".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn expiring_keys_disappear() {
        let store = MemoryStore::new();
        store
            .set_with_expiry("alert.1.cooldown", "", Duration::from_secs(60))
            .await
            .unwrap();
        assert!(store.exists("alert.1.cooldown").await.unwrap());
        assert_eq!(store.ttl("alert.1.cooldown").await, Some(Duration::from_secs(60)));

        tokio::time::advance(Duration::from_secs(30)).await;
        assert!(store.exists("alert.1.cooldown").await.unwrap());

        tokio::time::advance(Duration::from_secs(31)).await;
        assert!(!store.exists("alert.1.cooldown").await.unwrap());
        assert!(store.keys("alert.*").await.unwrap().is_empty());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn plain_set_clears_expiry() {
        let store = MemoryStore::new();
        store
            .set_with_expiry("k", "v", Duration::from_secs(5))
            .await
            .unwrap();
        store.set("k", "v2").await.unwrap();
        assert_eq!(store.ttl("k").await, None);
        assert_eq!(store.len().await, 1);
    }
}
