//! Key-value capability used by the alert checker.
//!
//! This crate provides:
//! - `AlertStore` trait: the get/set/expire/delete surface the checker consumes
//! - `RedisStore`: the production backend
//! - `MemoryStore`: an in-process backend with emulated key expiry

pub mod error;
pub mod memory;
pub mod redis_store;
pub mod traits;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use redis_store::RedisStore;
pub use traits::AlertStore;
