//! Module publish pipeline - the write side of the proxy.
//!
//! Synthesizes the proxy artifacts for one module version from a raw source
//! tree already present in storage. For module `example.com/foo/bar` at
//! version `0.0.1`, one `update` call produces:
//!
//!   example.com/foo/bar/@v/v0.0.1.mod   - go.mod, copied unchanged
//!   example.com/foo/bar/@v/v0.0.1.zip   - source tree under example.com/foo/bar@v0.0.1/
//!   example.com/foo/bar/@v/v0.0.1.info  - {"Version":"v0.0.1","Time":...}
//!   example.com/foo/bar/@v/list         - one version tag per line, appended

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;
use tracing::info;

use crate::error::{AppError, Result};
use crate::goproxy::{archive, version_list, VersionInfo};
use crate::storage::StorageBackend;

/// Summary of one successful publish.
#[derive(Debug, Clone, Serialize)]
pub struct PublishSummary {
    pub module: String,
    /// Published tag, `v` prefix included.
    pub version: String,
    pub zip_size: usize,
    pub zip_sha256: String,
}

/// Publishes module versions.
pub struct PublishService {
    storage: Arc<dyn StorageBackend>,
    /// One lock per module path, guarding the list read-modify-write.
    list_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl PublishService {
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self {
            storage,
            list_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Publish `version` of `module` (e.g. `"example.com/foo/bar"`, `"0.0.1"`).
    ///
    /// The source tree must already be stored under the module's
    /// repository-relative path (`foo/bar/` here) with a `go.mod` at its
    /// root. The version tag is opaque; no semver parsing happens anywhere.
    ///
    /// Steps run strictly in sequence. A failure aborts the remainder and
    /// leaves earlier writes in place; re-running the same update rewrites
    /// all four artifacts and appends a duplicate list line.
    pub async fn update(&self, module: &str, version: &str) -> Result<PublishSummary> {
        let (_domain, repo_path) = module.split_once('/').ok_or_else(|| {
            AppError::Validation(format!(
                "module path must be <domain>/<path>, got: {}",
                module
            ))
        })?;
        if repo_path.is_empty() {
            return Err(AppError::Validation(format!(
                "module path has an empty repository path: {}",
                module
            )));
        }

        // 1. go.mod at the source tree root is the one mandatory input.
        let source_mod_key = format!("{}/go.mod", repo_path);
        if !self.storage.exists(&source_mod_key).await? {
            return Err(AppError::SourceNotFound(source_mod_key));
        }
        let go_mod = self.storage.get(&source_mod_key).await?;

        // 2. Publish it unchanged.
        self.storage
            .put(&format!("{}/@v/v{}.mod", module, version), go_mod)
            .await?;

        // 3-4. Archive the source tree and publish the zip.
        let zip = archive::build(
            self.storage.as_ref(),
            &format!("{}/", repo_path),
            &format!("{}@v{}", module, version),
        )
        .await?;
        let zip_size = zip.len();
        let zip_sha256 = format!("{:x}", Sha256::digest(&zip));
        self.storage
            .put(&format!("{}/@v/v{}.zip", module, version), zip)
            .await?;

        // 5. Version metadata, wall clock truncated to whole seconds.
        let version_info = VersionInfo {
            version: format!("v{}", version),
            time: Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        };
        self.storage
            .put(
                &format!("{}/@v/v{}.info", module, version),
                Bytes::from(serde_json::to_vec(&version_info)?),
            )
            .await?;

        // 6. List read-modify-write, serialized per module so concurrent
        // publishes of different versions cannot drop each other's entry.
        let lock = self.module_lock(module).await;
        let _guard = lock.lock().await;
        let list_key = format!("{}/@v/list", module);
        let existing = if self.storage.exists(&list_key).await? {
            self.storage.get(&list_key).await?
        } else {
            Bytes::new()
        };
        let updated = version_list::append_version(&existing, version);
        self.storage.put(&list_key, Bytes::from(updated)).await?;

        info!(module, version, zip_size, %zip_sha256, "published module version");

        Ok(PublishSummary {
            module: module.to_string(),
            version: version_info.version,
            zip_size,
            zip_sha256,
        })
    }

    async fn module_lock(&self, module: &str) -> Arc<Mutex<()>> {
        let mut locks = self.list_locks.lock().await;
        locks
            .entry(module.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::InMemoryStorage;

    fn service() -> (PublishService, Arc<InMemoryStorage>) {
        let storage = Arc::new(InMemoryStorage::new());
        (PublishService::new(storage.clone()), storage)
    }

    async fn seed_source(storage: &InMemoryStorage) {
        storage
            .put(
                "foo/bar/go.mod",
                Bytes::from_static(b"module example.com/foo/bar\n"),
            )
            .await
            .unwrap();
        storage
            .put("foo/bar/a.go", Bytes::from_static(b"package bar\n"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn update_publishes_all_four_artifacts() {
        let (service, storage) = service();
        seed_source(&storage).await;

        let summary = service.update("example.com/foo/bar", "0.0.1").await.unwrap();
        assert_eq!(summary.version, "v0.0.1");

        for key in [
            "example.com/foo/bar/@v/v0.0.1.mod",
            "example.com/foo/bar/@v/v0.0.1.zip",
            "example.com/foo/bar/@v/v0.0.1.info",
            "example.com/foo/bar/@v/list",
        ] {
            assert!(storage.exists(key).await.unwrap(), "missing {}", key);
        }

        let go_mod = storage.get("example.com/foo/bar/@v/v0.0.1.mod").await.unwrap();
        assert_eq!(&go_mod[..], b"module example.com/foo/bar\n");

        let list = storage.get("example.com/foo/bar/@v/list").await.unwrap();
        assert_eq!(&list[..], b"v0.0.1");
    }

    #[tokio::test]
    async fn info_payload_has_version_and_second_precision_time() {
        let (service, storage) = service();
        seed_source(&storage).await;

        service.update("example.com/foo/bar", "0.0.1").await.unwrap();

        let info = storage.get("example.com/foo/bar/@v/v0.0.1.info").await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&info).unwrap();
        assert_eq!(value["Version"], "v0.0.1");
        assert_eq!(value.as_object().unwrap().len(), 2);

        let time = value["Time"].as_str().unwrap();
        let parsed = chrono::DateTime::parse_from_rfc3339(time).unwrap();
        assert_eq!(parsed.timestamp_subsec_nanos(), 0);
        assert!(time.ends_with('Z') && !time.contains('.'));
    }

    #[tokio::test]
    async fn list_accumulates_versions_in_call_order() {
        let (service, storage) = service();
        seed_source(&storage).await;

        service.update("example.com/foo/bar", "0.0.1").await.unwrap();
        service.update("example.com/foo/bar", "0.0.2").await.unwrap();

        let list = storage.get("example.com/foo/bar/@v/list").await.unwrap();
        assert_eq!(&list[..], b"v0.0.1\nv0.0.2");
    }

    #[tokio::test]
    async fn retried_update_appends_duplicate_list_line() {
        let (service, storage) = service();
        seed_source(&storage).await;

        service.update("example.com/foo/bar", "0.0.1").await.unwrap();
        service.update("example.com/foo/bar", "0.0.1").await.unwrap();

        let list = storage.get("example.com/foo/bar/@v/list").await.unwrap();
        assert_eq!(&list[..], b"v0.0.1\nv0.0.1");
    }

    #[tokio::test]
    async fn missing_go_mod_is_source_not_found() {
        let (service, storage) = service();
        storage
            .put("foo/bar/a.go", Bytes::from_static(b"package bar\n"))
            .await
            .unwrap();

        let err = service.update("example.com/foo/bar", "0.0.1").await.unwrap_err();
        assert!(matches!(err, AppError::SourceNotFound(_)));
        // nothing was published
        assert!(storage
            .list("example.com/foo/bar/")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn module_without_path_is_rejected() {
        let (service, _storage) = service();
        let err = service.update("example.com", "0.0.1").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn zip_checksum_matches_stored_archive() {
        let (service, storage) = service();
        seed_source(&storage).await;

        let summary = service.update("example.com/foo/bar", "0.0.1").await.unwrap();

        let zip = storage.get("example.com/foo/bar/@v/v0.0.1.zip").await.unwrap();
        assert_eq!(summary.zip_size, zip.len());
        assert_eq!(summary.zip_sha256, format!("{:x}", Sha256::digest(&zip)));
    }
}
