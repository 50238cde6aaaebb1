//! In-process key-value store.

use crate::domain::errors::StoreError;
use crate::domain::repositories::KeyValueStore;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

/// A store that keeps mappings in process memory.
///
/// Not durable. Used by integration tests and by the admin tool's dry
/// runs, where talking to Redis is unwanted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `entries`.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        Self {
            entries: RwLock::new(map),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Copies all entries, sorted by key.
    pub fn snapshot(&self) -> Vec<(String, String)> {
        let mut entries: Vec<_> = self
            .entries
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        entries.sort();
        entries
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_key() {
        let store = MemoryStore::new();
        assert_eq!(store.get("absent.zip").await.unwrap(), None);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = MemoryStore::with_entries([("a.zip", "https://old.example.com/a.zip")]);

        store.set("a.zip", "https://new.example.com/a.zip").await.unwrap();

        assert_eq!(
            store.get("a.zip").await.unwrap().as_deref(),
            Some("https://new.example.com/a.zip")
        );
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_snapshot_is_sorted() {
        let store = MemoryStore::with_entries([("b", "2"), ("a", "1")]);
        assert_eq!(
            store.snapshot(),
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string())
            ]
        );
    }
}
