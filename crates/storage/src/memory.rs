use async_trait::async_trait;
use std::sync::RwLock;
use tracing::debug;

use photo_search_common::{PhotoDocument, PhotoSearchError, Result, WriteOutcome};

use crate::index::{LabelQuery, SearchIndex};

/// Process-local index with id-keyed, last-write-wins documents.
///
/// Results come back in first-insertion order; overwriting a document keeps
/// its original position.
#[derive(Debug, Default)]
pub struct MemoryIndex {
    docs: RwLock<Vec<PhotoDocument>>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, object_key: &str) -> Option<PhotoDocument> {
        self.docs
            .read()
            .ok()?
            .iter()
            .find(|d| d.object_key == object_key)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.docs.read().map(|docs| docs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SearchIndex for MemoryIndex {
    async fn upsert(&self, doc: &PhotoDocument) -> Result<WriteOutcome> {
        let mut docs = self
            .docs
            .write()
            .map_err(|_| PhotoSearchError::IndexWrite("memory index lock poisoned".to_string()))?;

        let outcome = match docs.iter_mut().find(|d| d.object_key == doc.object_key) {
            Some(existing) => {
                *existing = doc.clone();
                WriteOutcome::Updated
            }
            None => {
                docs.push(doc.clone());
                WriteOutcome::Created
            }
        };

        debug!(object_key = %doc.object_key, result = %outcome, "Memory index write");
        Ok(outcome)
    }

    async fn search(&self, query: &LabelQuery) -> Result<Vec<PhotoDocument>> {
        let docs = self
            .docs
            .read()
            .map_err(|_| PhotoSearchError::Search("memory index lock poisoned".to_string()))?;

        Ok(docs
            .iter()
            .filter(|d| query.matches(d))
            .take(query.size)
            .cloned()
            .collect())
    }
}
