//! Object-created notifications in the S3 event layout

use serde::{Deserialize, Serialize};

use photo_search_common::{PhotoSearchError, Result};

/// Batch of notifications delivered to the ingestion trigger
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S3Event {
    #[serde(rename = "Records", default)]
    pub records: Vec<S3EventRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S3EventRecord {
    #[serde(rename = "eventName", default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,

    #[serde(default)]
    pub s3: S3Entity,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S3Entity {
    #[serde(default)]
    pub bucket: S3BucketEntity,

    #[serde(default)]
    pub object: S3ObjectEntity,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S3BucketEntity {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S3ObjectEntity {
    /// URL-encoded as delivered by S3
    #[serde(default)]
    pub key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl S3Event {
    /// Build an event for already-decoded bucket/key pairs
    pub fn from_objects<I, B, K>(objects: I) -> Self
    where
        I: IntoIterator<Item = (B, K)>,
        B: Into<String>,
        K: AsRef<str>,
    {
        let records = objects
            .into_iter()
            .map(|(bucket, key)| S3EventRecord {
                event_name: Some("ObjectCreated:Put".to_string()),
                s3: S3Entity {
                    bucket: S3BucketEntity { name: bucket.into() },
                    object: S3ObjectEntity {
                        key: urlencoding::encode(key.as_ref()).into_owned(),
                        size: None,
                    },
                },
            })
            .collect();
        Self { records }
    }

    pub fn object_refs(&self) -> Vec<ObjectRef> {
        self.records
            .iter()
            .map(|r| ObjectRef::from_notification(&r.s3.bucket.name, &r.s3.object.key))
            .collect()
    }
}

/// One object to ingest
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectRef {
    pub bucket: String,
    pub key: String,
}

impl ObjectRef {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Decode a notification key (`+` for space, `%XX` escapes)
    pub fn from_notification(bucket: &str, raw_key: &str) -> Self {
        let plus_decoded = raw_key.replace('+', " ");
        let key = match urlencoding::decode(&plus_decoded) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => raw_key.to_string(),
        };
        Self::new(bucket, key)
    }

    pub fn validate(&self) -> Result<()> {
        if self.bucket.trim().is_empty() {
            return Err(PhotoSearchError::InvalidInput(format!(
                "notification for key '{}' has no bucket name",
                self.key
            )));
        }
        if self.key.trim().is_empty() {
            return Err(PhotoSearchError::InvalidInput(format!(
                "notification for bucket '{}' has no object key",
                self.bucket
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_put_notification() {
        let event: S3Event = serde_json::from_value(serde_json::json!({
            "Records": [{
                "eventVersion": "2.1",
                "eventSource": "aws:s3",
                "eventName": "ObjectCreated:Put",
                "s3": {
                    "bucket": { "name": "b1", "arn": "arn:aws:s3:::b1" },
                    "object": { "key": "holiday/beach+day%281%29.jpg", "size": 1024 }
                }
            }]
        }))
        .unwrap();

        let refs = event.object_refs();
        assert_eq!(refs, vec![ObjectRef::new("b1", "holiday/beach day(1).jpg")]);
        assert_eq!(event.records[0].s3.object.size, Some(1024));
    }

    #[test]
    fn test_missing_fields_become_invalid_refs() {
        let event: S3Event = serde_json::from_value(serde_json::json!({
            "Records": [{ "s3": { "object": { "key": "k1" } } }, {}]
        }))
        .unwrap();

        let refs = event.object_refs();
        assert_eq!(refs.len(), 2);
        assert!(matches!(refs[0].validate(), Err(PhotoSearchError::InvalidInput(_))));
        assert!(refs[1].validate().is_err());
    }

    #[test]
    fn test_from_objects_round_trips_keys() {
        let event = S3Event::from_objects([("b1", "my photo.jpg"), ("b1", "k2")]);
        assert_eq!(
            event.object_refs(),
            vec![ObjectRef::new("b1", "my photo.jpg"), ObjectRef::new("b1", "k2")]
        );
    }

    #[test]
    fn test_empty_event() {
        let event: S3Event = serde_json::from_str("{}").unwrap();
        assert!(event.object_refs().is_empty());
    }
}
