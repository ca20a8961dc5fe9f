//! Latest-version resolution for `@latest`.

use bytes::Bytes;

use crate::error::Result;
use crate::storage::StorageBackend;

/// Resolve `@latest` for a module: the payload of the lexicographically
/// greatest `.info` key under `<module>/@v/`, or `None` when the module has
/// no published versions.
///
/// The maximum is taken over the full key string, not a parsed version, so
/// `v10.0.0` sorts below `v9.0.0`. Go clients already observe this ordering
/// against the registry, so it is kept as-is.
pub async fn resolve(storage: &dyn StorageBackend, module: &str) -> Result<Option<Bytes>> {
    let keys = storage.list(&format!("{}/@v/", module)).await?;
    let latest = keys.into_iter().filter(|key| key.ends_with("info")).max();

    match latest {
        Some(key) => Ok(Some(storage.get(&key).await?)),
        None => Ok(None),
    }
}
