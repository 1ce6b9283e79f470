use std::cell::RefCell;
use std::collections::BTreeMap;

use chrono::Utc;

use super::{validate_key, ObjectMeta, ObjectStore, StoreError};

/// Keeps objects in memory; for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: RefCell<BTreeMap<(String, String), (Vec<u8>, ObjectMeta)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `(bucket, key)` currently stored, sorted.
    pub fn keys(&self) -> Vec<(String, String)> {
        self.objects.borrow().keys().cloned().collect()
    }
}

impl ObjectStore for MemoryStore {
    fn put(
        &self,
        bucket: &str,
        key: &str,
        body: &[u8],
        content_type: &str,
    ) -> Result<ObjectMeta, StoreError> {
        validate_key(key)?;
        let meta = ObjectMeta {
            content_type: content_type.to_string(),
            size: body.len() as u64,
            last_modified: Utc::now(),
        };
        self.objects.borrow_mut().insert(
            (bucket.to_string(), key.to_string()),
            (body.to_vec(), meta.clone()),
        );
        Ok(meta)
    }

    fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError> {
        self.objects
            .borrow()
            .get(&(bucket.to_string(), key.to_string()))
            .map(|(body, _)| body.clone())
            .ok_or_else(|| StoreError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }

    fn head(&self, bucket: &str, key: &str) -> Result<ObjectMeta, StoreError> {
        self.objects
            .borrow()
            .get(&(bucket.to_string(), key.to_string()))
            .map(|(_, meta)| meta.clone())
            .ok_or_else(|| StoreError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }
}
