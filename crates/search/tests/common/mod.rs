#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use photo_search_common::{
    PhotoDocument, PhotoSearchError, Result, SearchConfig, WriteOutcome,
};
use photo_search_query::{IntentResolution, IntentResolver, QueryResolver, RecognizedSlot};
use photo_search_storage::{LabelQuery, MemoryIndex, ObjectStore, SearchIndex};

/// Intent resolver answering from a fixed utterance → slots table
#[derive(Default)]
pub struct FakeIntents {
    pub answers: HashMap<String, Vec<RecognizedSlot>>,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl FakeIntents {
    pub fn answering(text: &str, slots: Vec<RecognizedSlot>) -> Self {
        let mut answers = HashMap::new();
        answers.insert(text.to_string(), slots);
        Self {
            answers,
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
impl IntentResolver for FakeIntents {
    async fn recognize_text(&self, text: &str) -> Result<IntentResolution> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(PhotoSearchError::IntentResolution(
                "bot is unavailable".to_string(),
            ));
        }
        Ok(IntentResolution {
            slots: self.answers.get(text).cloned().unwrap_or_default(),
        })
    }
}

/// Index wrapper that counts searches and can be forced to fail
#[derive(Default)]
pub struct CountingIndex {
    pub inner: MemoryIndex,
    pub searches: AtomicUsize,
    pub failure: Option<fn(String) -> PhotoSearchError>,
}

impl CountingIndex {
    pub async fn with_docs(docs: &[PhotoDocument]) -> Self {
        let index = Self::default();
        for doc in docs {
            index.inner.upsert(doc).await.unwrap();
        }
        index
    }

    pub fn failing_with(failure: fn(String) -> PhotoSearchError) -> Self {
        Self {
            failure: Some(failure),
            ..Self::default()
        }
    }
}

#[async_trait]
impl SearchIndex for CountingIndex {
    async fn upsert(&self, doc: &PhotoDocument) -> Result<WriteOutcome> {
        self.inner.upsert(doc).await
    }

    async fn search(&self, query: &LabelQuery) -> Result<Vec<PhotoDocument>> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        match self.failure {
            Some(failure) => Err(failure("cluster is red".to_string())),
            None => self.inner.search(query).await,
        }
    }
}

/// Link issuer that records the requested expiry and can fail per key
#[derive(Default)]
pub struct FakeLinks {
    pub fail_keys: HashSet<String>,
    pub expiries: Mutex<Vec<Duration>>,
    pub calls: AtomicUsize,
}

impl FakeLinks {
    pub fn failing_for(keys: &[&str]) -> Self {
        Self {
            fail_keys: keys.iter().map(|k| k.to_string()).collect(),
            ..Self::default()
        }
    }
}

#[async_trait]
impl ObjectStore for FakeLinks {
    async fn object_metadata(&self, _bucket: &str, _key: &str) -> Result<HashMap<String, String>> {
        Ok(HashMap::new())
    }

    async fn presigned_get_url(&self, bucket: &str, key: &str, expires_in: Duration) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.expiries.lock().unwrap().push(expires_in);
        if self.fail_keys.contains(key) {
            return Err(PhotoSearchError::LinkGeneration(format!(
                "access denied for {}",
                key
            )));
        }
        Ok(format!(
            "https://{}.s3.amazonaws.com/{}?X-Amz-Expires={}",
            bucket,
            key,
            expires_in.as_secs()
        ))
    }
}

pub fn photo(key: &str, labels: &[&str]) -> PhotoDocument {
    PhotoDocument {
        object_key: key.to_string(),
        bucket: "photos-bucket".to_string(),
        created_timestamp: "2024-05-01T10:11:12".to_string(),
        labels: labels.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn resolver(
    intents: Arc<FakeIntents>,
    index: Arc<CountingIndex>,
    links: Arc<FakeLinks>,
) -> QueryResolver {
    QueryResolver::new(intents, index, links, SearchConfig::default())
}
