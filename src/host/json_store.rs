//! Durable symbol table cache on disk
//!
//! One JSON file per library key under a cache directory. A table written
//! here in one run is served without any fetch in every later run until the
//! directory is cleared externally. Writes go through a temp file and rename
//! so a crashed run never leaves a half-written table behind.

use crate::domain::{DurableStoreError, LibraryKey};
use crate::symbolication::store::DurableStore;
use crate::symbolication::SymbolTable;
use std::hash::Hasher;
use std::path::{Path, PathBuf};

pub struct JsonDirStore {
    cache_dir: PathBuf,
}

impl JsonDirStore {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self { cache_dir: cache_dir.into() }
    }

    fn path_for(&self, key: &LibraryKey) -> PathBuf {
        let file = format!(
            "{}-{}-{:016x}.json",
            sanitize(&key.debug_name),
            sanitize(&key.build_id),
            key_hash(key)
        );
        self.cache_dir.join(file)
    }
}

/// Keep cache file names portable: anything outside [A-Za-z0-9._-] becomes '_'.
fn sanitize(part: &str) -> String {
    part.chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '_' })
        .collect()
}

/// FNV-1a over the unsanitized key. Distinct names can sanitize to the same
/// string, so the file name carries this to keep one file per key. FNV is
/// seed-free and stable across runs.
fn key_hash(key: &LibraryKey) -> u64 {
    let mut hasher = fnv::FnvHasher::default();
    hasher.write(key.debug_name.as_bytes());
    hasher.write(&[0]);
    hasher.write(key.build_id.as_bytes());
    hasher.finish()
}

impl DurableStore for JsonDirStore {
    async fn get(&self, key: &LibraryKey) -> Result<Option<SymbolTable>, DurableStoreError> {
        let path = self.path_for(key);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(DurableStoreError::ReadFailed(format!("{}: {e}", path.display()))),
        };
        let table = serde_json::from_str(&content)?;
        Ok(Some(table))
    }

    async fn put(&self, key: &LibraryKey, table: &SymbolTable) -> Result<(), DurableStoreError> {
        tokio::fs::create_dir_all(&self.cache_dir).await?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        let content = serde_json::to_vec(table)?;

        write_atomically(&tmp, &path, &content)
            .await
            .map_err(|e| DurableStoreError::WriteFailed(format!("{}: {e}", path.display())))
    }
}

async fn write_atomically(tmp: &Path, path: &Path, content: &[u8]) -> std::io::Result<()> {
    tokio::fs::write(tmp, content).await?;
    tokio::fs::rename(tmp, path).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolication::SymbolEntry;

    fn table() -> SymbolTable {
        SymbolTable::new(vec![
            SymbolEntry { offset: 0x10, name: "foo".to_string() },
            SymbolEntry { offset: 0x50, name: "bar".to_string() },
        ])
    }

    #[tokio::test]
    async fn test_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::new(dir.path());
        let key = LibraryKey::new("libxul.so", "abc123");

        assert!(store.get(&key).await.unwrap().is_none());

        store.put(&key, &table()).await.unwrap();
        let loaded = store.get(&key).await.unwrap().unwrap();
        assert_eq!(loaded, table());
    }

    #[tokio::test]
    async fn test_keys_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::new(dir.path());
        let a = LibraryKey::new("libxul.so", "aaaa");
        let b = LibraryKey::new("libxul.so", "bbbb");

        store.put(&a, &table()).await.unwrap();
        assert!(store.get(&b).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_names_that_sanitize_alike_do_not_alias() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::new(dir.path());
        // Both debug names sanitize to "lib_a.so".
        let a = LibraryKey::new("lib+a.so", "abc123");
        let b = LibraryKey::new("lib_a.so", "abc123");
        assert_ne!(store.path_for(&a), store.path_for(&b));

        store.put(&a, &table()).await.unwrap();
        assert!(store.get(&b).await.unwrap().is_none());
        assert_eq!(store.get(&a).await.unwrap().unwrap(), table());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::new(dir.path());
        let key = LibraryKey::new("libxul.so", "abc123");

        std::fs::write(store.path_for(&key), b"{ definitely not a table").unwrap();
        assert!(store.get(&key).await.is_err());
    }

    #[test]
    fn test_sanitize_strips_path_separators() {
        assert_eq!(sanitize("../evil/lib.so"), ".._evil_lib.so");
        assert_eq!(sanitize("libc++.so.1"), "libc__.so.1");
    }
}
