//! The store capability trait.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::StoreError;

/// Get/set/expire/delete capability over string keys and values.
///
/// Passed explicitly to everything that touches persisted state; there is no
/// ambient connection handle.
#[async_trait]
pub trait AlertStore: Send + Sync {
    /// List keys matching a glob `pattern` (only a trailing `*` is required to be supported).
    async fn keys(&self, pattern: &str) -> Result<Vec<String>, StoreError>;

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Fetch several keys at once. The result has one slot per input key, in order.
    async fn multi_get(&self, keys: &[String]) -> Result<Vec<Option<String>>, StoreError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    async fn exists(&self, key: &str) -> Result<bool, StoreError>;

    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Set `key` so that it disappears after `ttl`.
    async fn set_with_expiry(&self, key: &str, value: &str, ttl: Duration)
        -> Result<(), StoreError>;
}
