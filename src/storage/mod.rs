//! Storage backends.

pub mod filesystem;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;

use crate::config::Config;
use crate::error::{AppError, Result};

/// Storage backend trait
///
/// Keys are `/`-separated strings; the publish pipeline and the proxy
/// handlers agree on the key layout (`<module>/@v/...`), the backend only
/// moves bytes.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Store content with the given key
    async fn put(&self, key: &str, content: Bytes) -> Result<()>;

    /// Retrieve content by key
    async fn get(&self, key: &str) -> Result<Bytes>;

    /// Check if key exists
    async fn exists(&self, key: &str) -> Result<bool>;

    /// List all keys sharing the given prefix, recursively.
    ///
    /// Listing order is backend-defined; callers must not rely on it.
    async fn list(&self, prefix: &str) -> Result<Vec<String>>;
}

/// Create the storage backend selected by the configuration.
pub async fn from_config(config: &Config) -> Result<Arc<dyn StorageBackend>> {
    match config.storage_backend.as_str() {
        "filesystem" => {
            let path = std::path::PathBuf::from(&config.storage_path);
            fs::create_dir_all(&path).await?;
            Ok(Arc::new(filesystem::FilesystemStorage::new(path)))
        }
        "memory" => {
            tracing::warn!("in-memory storage selected, contents are not persisted");
            Ok(Arc::new(memory::InMemoryStorage::new()))
        }
        other => Err(AppError::Config(format!(
            "Unknown storage backend: {}",
            other
        ))),
    }
}
