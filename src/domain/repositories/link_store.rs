//! Key-value store trait backing the link cache.

use crate::domain::errors::StoreError;
use async_trait::async_trait;

/// Durable string → string store holding artifact base name → URL mappings.
///
/// The refresher is the only writer; any number of lookups read
/// concurrently. Implementations handle their own synchronization, so
/// callers never take a lock around these methods.
///
/// # Implementations
///
/// - [`crate::infrastructure::store::RedisStore`] - Redis-backed production store
/// - [`crate::infrastructure::store::MemoryStore`] - In-process store for tests and dry runs
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))` if present
    /// - `Ok(None)` if the key was never written
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Read`] when the store cannot answer.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// A failed write leaves the previous value untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Write`] when the value was not stored.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Checks if the store is reachable.
    async fn health_check(&self) -> bool;
}
