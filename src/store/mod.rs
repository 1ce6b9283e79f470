// src/store/mod.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};

use crate::dataset::Dataset;

pub mod local;
pub mod memory;

pub use local::LocalStore;
pub use memory::MemoryStore;

pub const CSV_CONTENT_TYPE: &str = "text/csv";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },
    #[error("invalid object key: {0}")]
    InvalidKey(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("metadata error: {0}")]
    Metadata(#[from] serde_json::Error),
    #[error("serialization error: {0}")]
    Serialize(String),
}

/// What a store knows about an object without reading its body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub content_type: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}

/// Bucket/key addressed object storage.
pub trait ObjectStore {
    fn put(&self, bucket: &str, key: &str, body: &[u8], content_type: &str)
        -> Result<ObjectMeta, StoreError>;

    fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError>;

    fn head(&self, bucket: &str, key: &str) -> Result<ObjectMeta, StoreError>;
}

/// What happened to a dataset handed to [`persist_dataset`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    Written { bytes: u64 },
    SkippedEmpty,
}

/// Write `dataset` as CSV under its key. Empty datasets are skipped, never
/// written as empty files.
#[instrument(level = "info", skip(store, dataset), fields(dataset = %dataset.name, key = %dataset.key))]
pub fn persist_dataset(
    store: &dyn ObjectStore,
    bucket: &str,
    dataset: &Dataset,
) -> Result<PersistOutcome, StoreError> {
    if dataset.is_empty() {
        info!("skipping upload: empty dataset");
        return Ok(PersistOutcome::SkippedEmpty);
    }
    let body = dataset
        .to_csv()
        .map_err(|e| StoreError::Serialize(e.to_string()))?;
    let meta = store.put(bucket, &dataset.key, &body, CSV_CONTENT_TYPE)?;
    info!(rows = dataset.len(), bytes = meta.size, "uploaded {}/{}", bucket, dataset.key);
    Ok(PersistOutcome::Written { bytes: meta.size })
}

/// Reject keys that could escape the bucket when mapped onto a filesystem.
pub(crate) fn validate_key(key: &str) -> Result<(), StoreError> {
    let bad = key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..");
    if bad {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(())
}
