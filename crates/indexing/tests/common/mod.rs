//! Collaborator fakes for ingestion tests

use async_trait::async_trait;
use chrono::NaiveDate;
use photo_search_common::{
    IngestionConfig, PhotoDocument, PhotoSearchError, Result, WriteOutcome,
};
use photo_search_indexing::{DetectedLabel, FixedClock, IngestionPipeline, VisionLabeler};
use photo_search_storage::{LabelQuery, MemoryIndex, ObjectStore, SearchIndex};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Object store serving fixed metadata per key
#[derive(Default)]
pub struct FakeObjectStore {
    pub metadata: HashMap<String, HashMap<String, String>>,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl FakeObjectStore {
    pub fn with_custom_labels(entries: &[(&str, &str)]) -> Self {
        let metadata = entries
            .iter()
            .map(|(key, labels)| {
                let mut meta = HashMap::new();
                meta.insert("customlabels".to_string(), labels.to_string());
                (key.to_string(), meta)
            })
            .collect();
        Self {
            metadata,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl ObjectStore for FakeObjectStore {
    async fn object_metadata(&self, _bucket: &str, key: &str) -> Result<HashMap<String, String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(PhotoSearchError::Collaborator("head_object: AccessDenied".to_string()));
        }
        Ok(self.metadata.get(key).cloned().unwrap_or_default())
    }

    async fn presigned_get_url(
        &self,
        bucket: &str,
        key: &str,
        _expires_in: Duration,
    ) -> Result<String> {
        Ok(format!("https://{}.s3.amazonaws.com/{}", bucket, key))
    }
}

/// Labeler returning the same labels for every image
#[derive(Default)]
pub struct FakeLabeler {
    pub labels: Vec<DetectedLabel>,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl FakeLabeler {
    pub fn returning(labels: &[(&str, f32)]) -> Self {
        Self {
            labels: labels
                .iter()
                .map(|(name, confidence)| DetectedLabel::new(*name, *confidence))
                .collect(),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl VisionLabeler for FakeLabeler {
    async fn detect_labels(
        &self,
        _bucket: &str,
        _key: &str,
        _max_labels: i32,
        _min_confidence: f32,
    ) -> Result<Vec<DetectedLabel>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(PhotoSearchError::Collaborator("InvalidImageFormatException".to_string()));
        }
        Ok(self.labels.clone())
    }
}

/// Memory index that rejects writes for selected keys
pub struct FlakyIndex {
    pub inner: MemoryIndex,
    pub fail_keys: HashSet<String>,
    pub noop_keys: HashSet<String>,
}

impl FlakyIndex {
    pub fn failing_for(keys: &[&str]) -> Self {
        Self {
            inner: MemoryIndex::new(),
            fail_keys: keys.iter().map(|k| k.to_string()).collect(),
            noop_keys: HashSet::new(),
        }
    }

    pub fn noop_for(keys: &[&str]) -> Self {
        Self {
            inner: MemoryIndex::new(),
            fail_keys: HashSet::new(),
            noop_keys: keys.iter().map(|k| k.to_string()).collect(),
        }
    }
}

#[async_trait]
impl SearchIndex for FlakyIndex {
    async fn upsert(&self, doc: &PhotoDocument) -> Result<WriteOutcome> {
        if self.fail_keys.contains(&doc.object_key) {
            return Err(PhotoSearchError::IndexWrite(
                "OpenSearch returned error status 500".to_string(),
            ));
        }
        if self.noop_keys.contains(&doc.object_key) {
            return Ok(WriteOutcome::Other("noop".to_string()));
        }
        self.inner.upsert(doc).await
    }

    async fn search(&self, query: &LabelQuery) -> Result<Vec<PhotoDocument>> {
        self.inner.search(query).await
    }
}

pub fn fixed_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock(
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .and_then(|d| d.and_hms_opt(10, 11, 12))
            .unwrap(),
    ))
}

pub fn pipeline(
    index: Arc<dyn SearchIndex>,
    objects: Arc<dyn ObjectStore>,
    labeler: Arc<dyn VisionLabeler>,
) -> IngestionPipeline {
    IngestionPipeline::new(index, objects, labeler, IngestionConfig::default())
        .with_clock(fixed_clock())
}

pub fn label_set(items: &[&str]) -> std::collections::BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}
