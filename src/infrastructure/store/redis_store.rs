//! Redis-backed key-value store.

use crate::domain::errors::StoreError;
use crate::domain::repositories::KeyValueStore;
use async_trait::async_trait;
use redis::{
    AsyncCommands, Client,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, info, warn};

/// Connection attempts made before the store is declared unavailable.
const CONNECT_ATTEMPTS: usize = 3;
/// Reconnect attempts the connection manager makes on its own per failure.
const MANAGER_RETRIES: usize = 2;

/// Redis store for artifact link mappings.
///
/// Uses `ConnectionManager` for automatic reconnection; the manager is
/// cheap to clone and safe to use from many tasks at once, so readers and
/// the refresher never coordinate with each other.
pub struct RedisStore {
    client: ConnectionManager,
    key_prefix: String,
}

impl RedisStore {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// Retries with jittered exponential backoff before giving up.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://127.0.0.1:6379/0"`)
    /// - `key_prefix` - Namespace prepended to every key (may be empty)
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the URL is invalid, the
    /// connection cannot be established, or the PING fails.
    pub async fn connect(redis_url: &str, key_prefix: &str) -> Result<Self, StoreError> {
        info!("Connecting to Redis");

        let strategy = ExponentialBackoff::from_millis(100)
            .max_delay(Duration::from_secs(2))
            .map(jitter)
            .take(CONNECT_ATTEMPTS - 1);

        let manager = Retry::spawn(strategy, || Self::open(redis_url)).await?;

        info!("✓ Connected to Redis");

        Ok(Self {
            client: manager,
            key_prefix: key_prefix.to_string(),
        })
    }

    async fn open(redis_url: &str) -> Result<ConnectionManager, StoreError> {
        let client = Client::open(redis_url).map_err(|e| {
            StoreError::Unavailable(format!("Failed to create Redis client: {}", e))
        })?;

        let config = ConnectionManagerConfig::new().set_number_of_retries(MANAGER_RETRIES);
        let manager = ConnectionManager::new_with_config(client, config)
            .await
            .map_err(|e| {
                warn!("Redis connection attempt failed: {}", e);
                StoreError::Unavailable(format!("Failed to connect to Redis: {}", e))
            })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| StoreError::Unavailable(format!("Redis PING failed: {}", e)))?;

        Ok(manager)
    }

    /// Constructs the full Redis key with namespace prefix.
    fn build_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let full_key = self.build_key(key);
        let mut conn = self.client.clone();

        let value = conn
            .get::<_, Option<String>>(&full_key)
            .await
            .map_err(|e| StoreError::Read {
                key: key.to_string(),
                reason: e.to_string(),
            })?;

        match &value {
            Some(url) => debug!("Store HIT: {} -> {}", key, url),
            None => debug!("Store MISS: {}", key),
        }

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let full_key = self.build_key(key);
        let mut conn = self.client.clone();

        conn.set::<_, _, ()>(&full_key, value)
            .await
            .map_err(|e| StoreError::Write {
                key: key.to_string(),
                reason: e.to_string(),
            })?;

        debug!("Store SET: {} -> {}", key, value);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
