use async_trait::async_trait;
use serde_json::{json, Value};

use photo_search_common::{MatchMode, PhotoDocument, Result, WriteOutcome};

/// Disjunctive label query: a document matches when at least one keyword hits
#[derive(Debug, Clone, PartialEq)]
pub struct LabelQuery {
    pub keywords: Vec<String>,
    pub match_mode: MatchMode,
    pub size: usize,
}

impl LabelQuery {
    pub fn new(keywords: Vec<String>, match_mode: MatchMode, size: usize) -> Self {
        Self {
            keywords,
            match_mode,
            size,
        }
    }

    /// One `should` clause per keyword, in keyword order
    pub fn clauses(&self) -> Vec<Value> {
        self.keywords
            .iter()
            .map(|keyword| match self.match_mode {
                MatchMode::Match => json!({ "match": { "labels": keyword } }),
                MatchMode::Term => json!({ "term": { "labels.keyword": normalize(keyword) } }),
            })
            .collect()
    }

    /// `_search` request body
    pub fn to_request_body(&self) -> Value {
        json!({
            "query": {
                "bool": {
                    "should": self.clauses(),
                    "minimum_should_match": 1
                }
            },
            "size": self.size
        })
    }

    /// Evaluate the query against one document the way the backend would
    pub fn matches(&self, doc: &PhotoDocument) -> bool {
        match self.match_mode {
            MatchMode::Term => self
                .keywords
                .iter()
                .any(|k| doc.labels.contains(&normalize(k))),
            MatchMode::Match => {
                let label_tokens: Vec<String> =
                    doc.labels.iter().flat_map(|l| analyze(l)).collect();
                self.keywords
                    .iter()
                    .flat_map(|k| analyze(k))
                    .any(|token| label_tokens.contains(&token))
            }
        }
    }
}

/// Stored labels are trimmed and lower-cased, so exact lookups must be too
fn normalize(keyword: &str) -> String {
    keyword.trim().to_lowercase()
}

/// Lower-cased alphanumeric tokens, roughly what a standard analyzer emits
pub fn analyze(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

/// Document store holding one `PhotoDocument` per object key
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Write `doc` under its object key. Must be searchable once this returns.
    async fn upsert(&self, doc: &PhotoDocument) -> Result<WriteOutcome>;

    async fn search(&self, query: &LabelQuery) -> Result<Vec<PhotoDocument>>;
}
