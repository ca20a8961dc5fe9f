//! In-memory storage backend.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;

use super::StorageBackend;
use crate::error::{AppError, Result};

/// HashMap-based storage backend.
///
/// Intended for tests and embedding. Values are `Bytes`, so reads hand out
/// cheap reference-counted clones.
#[derive(Default)]
pub struct InMemoryStorage {
    objects: RwLock<HashMap<String, Bytes>>,
}

impl InMemoryStorage {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of objects currently stored.
    pub fn len(&self) -> usize {
        self.objects.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.read().expect("lock poisoned").is_empty()
    }
}

#[async_trait]
impl StorageBackend for InMemoryStorage {
    async fn put(&self, key: &str, content: Bytes) -> Result<()> {
        self.objects
            .write()
            .expect("lock poisoned")
            .insert(key.to_string(), content);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes> {
        self.objects
            .read()
            .expect("lock poisoned")
            .get(key)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Storage key not found: {}", key)))
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.objects.read().expect("lock poisoned").contains_key(key))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let map = self.objects.read().expect("lock poisoned");
        let mut keys: Vec<String> = map
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        // Sorted for determinism; callers must still not rely on order.
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_get_exists_roundtrip() {
        let storage = InMemoryStorage::new();
        assert!(storage.is_empty());

        storage.put("a/b", Bytes::from_static(b"hi")).await.unwrap();
        assert!(storage.exists("a/b").await.unwrap());
        assert!(!storage.exists("a/c").await.unwrap());
        assert_eq!(&storage.get("a/b").await.unwrap()[..], b"hi");
        assert_eq!(storage.len(), 1);
    }

    #[tokio::test]
    async fn get_missing_key_is_not_found() {
        let storage = InMemoryStorage::new();
        let err = storage.get("missing").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_filters_by_prefix() {
        let storage = InMemoryStorage::new();
        storage.put("m/@v/v0.0.1.info", Bytes::new()).await.unwrap();
        storage.put("m/@v/v0.0.1.mod", Bytes::new()).await.unwrap();
        storage.put("other/file", Bytes::new()).await.unwrap();

        let keys = storage.list("m/@v/").await.unwrap();
        assert_eq!(keys, vec!["m/@v/v0.0.1.info", "m/@v/v0.0.1.mod"]);
    }
}
