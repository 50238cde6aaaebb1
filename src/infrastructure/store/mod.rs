//! Key-value store implementations for the link cache.
//!
//! Provides two implementations of [`crate::domain::repositories::KeyValueStore`]:
//! - [`RedisStore`] - Production Redis-backed store
//! - [`MemoryStore`] - In-process store for testing and dry runs

mod memory_store;
mod redis_store;

pub use memory_store::MemoryStore;
pub use redis_store::RedisStore;
