//! Bucket notification decoding
//!
//! Decodes the standard object-event notification document and turns
//! its records into an ordered batch of [`ObjectEvent`]s.

use crate::error::Result;
use crate::types::ObjectEvent;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Notification {
    #[serde(rename = "Records", default)]
    pub records: Vec<S3Record>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Record {
    #[serde(rename = "eventName", default)]
    pub event_name: String,
    pub s3: S3Entity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Entity {
    pub bucket: S3Bucket,
    pub object: S3Object,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Bucket {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Object {
    pub key: String,
    pub size: u64,
}

impl S3Notification {
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Records in delivery order, keys passed through verbatim
    pub fn into_batch(self) -> Vec<ObjectEvent> {
        self.records.into_iter().map(ObjectEvent::from).collect()
    }
}

impl From<S3Record> for ObjectEvent {
    fn from(record: S3Record) -> Self {
        ObjectEvent {
            bucket: record.s3.bucket.name,
            key: record.s3.object.key,
            size: record.s3.object.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GuardError;

    const NOTIFICATION: &str = r#"{
        "Records": [
            {
                "eventVersion": "2.1",
                "eventSource": "aws:s3",
                "eventName": "ObjectCreated:Put",
                "s3": {
                    "bucket": {"name": "site-assets", "arn": "arn:aws:s3:::site-assets"},
                    "object": {"key": "img/logo.png", "size": 2048, "eTag": "abc"}
                }
            },
            {
                "eventName": "ObjectCreated:CompleteMultipartUpload",
                "s3": {
                    "bucket": {"name": "site-assets"},
                    "object": {"key": "bin/tool.exe", "size": 99}
                }
            }
        ]
    }"#;

    #[test]
    fn test_decode_preserves_order() {
        let notification = S3Notification::from_slice(NOTIFICATION.as_bytes()).unwrap();
        assert_eq!(notification.records[0].event_name, "ObjectCreated:Put");

        let batch = notification.into_batch();
        assert_eq!(
            batch,
            vec![
                ObjectEvent::new("site-assets", "img/logo.png", 2048),
                ObjectEvent::new("site-assets", "bin/tool.exe", 99),
            ]
        );
    }

    #[test]
    fn test_missing_records_is_empty_batch() {
        let notification = S3Notification::from_slice(b"{}").unwrap();
        assert!(notification.into_batch().is_empty());
    }

    #[test]
    fn test_malformed_document() {
        let err = S3Notification::from_slice(b"{\"Records\": [{\"s3\": {}}]}").unwrap_err();
        assert!(matches!(err, GuardError::Serialization(_)));
    }
}
