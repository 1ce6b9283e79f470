// src/event.rs

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{error, info, instrument};

use crate::store::ObjectStore;

/// Object-created notification, as emitted by S3-compatible stores.
/// Only the fields needed to locate the object are modelled.
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectEvent {
    #[serde(rename = "Records")]
    pub records: Vec<EventRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventRecord {
    pub s3: S3Entity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Entity {
    pub bucket: BucketEntity,
    pub object: ObjectEntity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BucketEntity {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectEntity {
    /// Form-urlencoded: spaces arrive as `+`, reserved bytes as `%XX`.
    pub key: String,
}

/// Decode an event key (`my+file%281%29.csv` → `my file(1).csv`).
pub fn decode_key(raw: &str) -> String {
    // the store percent-encodes `&` and `=`, so the whole key is one form field
    url::form_urlencoded::parse(raw.as_bytes())
        .next()
        .map(|(k, _)| k.into_owned())
        .unwrap_or_default()
}

/// Look up the object named by the first record and return its content type.
#[instrument(level = "info", skip(store, event))]
pub fn handle_object_event(store: &dyn ObjectStore, event: &ObjectEvent) -> Result<String> {
    let record = event
        .records
        .first()
        .context("event contains no records")?;
    let bucket = &record.s3.bucket.name;
    let key = decode_key(&record.s3.object.key);
    info!("Processing object: {} from bucket: {}", key, bucket);

    let meta = match store.head(bucket, &key) {
        Ok(meta) => meta,
        Err(e) => {
            error!(error = %e, "Could not get object {} from bucket {}", key, bucket);
            return Err(e).with_context(|| format!("getting object {} from bucket {}", key, bucket));
        }
    };

    info!(content_type = %meta.content_type, "object content type");
    Ok(meta.content_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn event(bucket: &str, key: &str) -> ObjectEvent {
        let raw = serde_json::json!({
            "Records": [{
                "eventName": "ObjectCreated:Put",
                "s3": {
                    "bucket": {"name": bucket, "arn": "arn:aws:s3:::films"},
                    "object": {"key": key, "size": 42}
                }
            }]
        });
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn key_decoding() {
        assert_eq!(decode_key("etl_output/movies_cleaned.csv"), "etl_output/movies_cleaned.csv");
        assert_eq!(decode_key("my+file%281%29.csv"), "my file(1).csv");
        assert_eq!(decode_key("a%2Bb.csv"), "a+b.csv");
    }

    #[test]
    fn reports_content_type() {
        let store = MemoryStore::new();
        store
            .put("films", "etl output/cast.csv", b"a\n1\n", "text/csv")
            .unwrap();
        let ct = handle_object_event(&store, &event("films", "etl+output/cast.csv")).unwrap();
        assert_eq!(ct, "text/csv");
    }

    #[test]
    fn missing_object_is_an_error() {
        let store = MemoryStore::new();
        let err = handle_object_event(&store, &event("films", "nope.csv")).unwrap_err();
        assert!(format!("{:#}", err).contains("nope.csv"));
    }

    #[test]
    fn empty_event_is_an_error() {
        let store = MemoryStore::new();
        let ev = ObjectEvent { records: vec![] };
        assert!(handle_object_event(&store, &ev).is_err());
    }
}
