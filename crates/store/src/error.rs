use thiserror::Error;

/// Errors produced by [`AlertStore`](crate::AlertStore) operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}
