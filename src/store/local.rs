// src/store/local.rs

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use chrono::Utc;
use tracing::debug;

use super::{validate_key, ObjectMeta, ObjectStore, StoreError};

const META_DIR: &str = ".meta";

/// Filesystem-backed store: `<root>/<bucket>/<key>` holds the body and
/// `<root>/.meta/<bucket>/<key>.json` its [`ObjectMeta`].
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(bucket)?;
        validate_key(key)?;
        Ok(self.root.join(bucket).join(key))
    }

    fn meta_path(&self, bucket: &str, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(bucket)?;
        validate_key(key)?;
        Ok(self
            .root
            .join(META_DIR)
            .join(bucket)
            .join(format!("{}.json", key)))
    }

    fn not_found(bucket: &str, key: &str) -> StoreError {
        StoreError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        }
    }
}

/// Write to a tmp file beside `path`, then rename over it.
fn write_atomic(path: &Path, body: &[u8]) -> Result<(), StoreError> {
    let dir = path
        .parent()
        .ok_or_else(|| StoreError::InvalidKey(path.display().to_string()))?;
    fs::create_dir_all(dir)?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let tmp_path = dir.join(format!(".{}.tmp", file_name));
    let mut tmp = fs::File::create(&tmp_path)?;
    tmp.write_all(body)?;
    tmp.sync_all()?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

impl ObjectStore for LocalStore {
    fn put(
        &self,
        bucket: &str,
        key: &str,
        body: &[u8],
        content_type: &str,
    ) -> Result<ObjectMeta, StoreError> {
        let path = self.object_path(bucket, key)?;
        write_atomic(&path, body)?;

        let meta = ObjectMeta {
            content_type: content_type.to_string(),
            size: body.len() as u64,
            last_modified: Utc::now(),
        };
        write_atomic(&self.meta_path(bucket, key)?, &serde_json::to_vec_pretty(&meta)?)?;
        debug!(path = %path.display(), bytes = meta.size, "wrote object");
        Ok(meta)
    }

    fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.object_path(bucket, key)?;
        fs::read(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Self::not_found(bucket, key),
            _ => StoreError::Io(e),
        })
    }

    fn head(&self, bucket: &str, key: &str) -> Result<ObjectMeta, StoreError> {
        let path = self.meta_path(bucket, key)?;
        let raw = fs::read(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Self::not_found(bucket, key),
            _ => StoreError::Io(e),
        })?;
        Ok(serde_json::from_slice(&raw)?)
    }
}
