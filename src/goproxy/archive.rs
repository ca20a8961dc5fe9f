//! Module zip construction over the storage port.

use std::io::{Cursor, Write};

use bytes::Bytes;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::{AppError, Result};
use crate::storage::StorageBackend;

/// Build a zip archive of every object under `source_prefix`.
///
/// Each key is stripped of the prefix and written as an entry at
/// `target_prefix/<relative path>`, in storage listing order. Objects are
/// copied one at a time, so at most one object's bytes are resident besides
/// the growing archive. Any read or entry failure aborts construction; no
/// partial archive is returned.
pub async fn build(
    storage: &dyn StorageBackend,
    source_prefix: &str,
    target_prefix: &str,
) -> Result<Bytes> {
    let keys = storage.list(source_prefix).await?;

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    for key in keys {
        let relative = key.strip_prefix(source_prefix).unwrap_or(&key);
        let entry = format!("{}/{}", target_prefix, relative);
        writer
            .start_file(entry.as_str(), options)
            .map_err(|e| AppError::Archive(format!("entry {}: {}", entry, e)))?;

        let content = storage.get(&key).await?;
        writer
            .write_all(&content)
            .map_err(|e| AppError::Archive(format!("entry {}: {}", entry, e)))?;
    }

    // finish() flushes the central directory and releases the writer.
    let cursor = writer
        .finish()
        .map_err(|e| AppError::Archive(e.to_string()))?;
    Ok(Bytes::from(cursor.into_inner()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::InMemoryStorage;
    use std::io::Read;

    #[tokio::test]
    async fn archives_source_tree_under_target_prefix() {
        let storage = InMemoryStorage::new();
        storage
            .put("foo/bar/a.go", Bytes::from_static(b"package bar\n"))
            .await
            .unwrap();
        storage
            .put("foo/bar/sub/b.go", Bytes::from_static(b"package sub\n"))
            .await
            .unwrap();

        let bytes = build(&storage, "foo/bar/", "example.com/foo/bar@v1.0.0")
            .await
            .unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        let mut names: Vec<String> = archive.file_names().map(String::from).collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "example.com/foo/bar@v1.0.0/a.go",
                "example.com/foo/bar@v1.0.0/sub/b.go",
            ]
        );

        let mut content = String::new();
        archive
            .by_name("example.com/foo/bar@v1.0.0/sub/b.go")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "package sub\n");
    }

    #[tokio::test]
    async fn empty_prefix_yields_empty_archive() {
        let storage = InMemoryStorage::new();

        let bytes = build(&storage, "nothing/", "m@v0.0.1").await.unwrap();

        let archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        assert_eq!(archive.len(), 0);
    }
}
