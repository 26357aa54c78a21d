use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use strum_macros::{Display, EnumString};

/// `createdTimestamp` layout: second precision, no offset
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// The unit of record in the index, keyed by `object_key`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoDocument {
    pub object_key: String,
    pub bucket: String,
    pub created_timestamp: String,
    #[serde(default)]
    pub labels: BTreeSet<String>,
}

impl PhotoDocument {
    /// Document id used by the index
    pub fn id(&self) -> &str {
        &self.object_key
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.contains(label)
    }
}

/// One entry of a search response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub url: String,
    pub labels: BTreeSet<String>,
}

/// What the index reported for an upsert
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    Updated,
    Other(String),
}

impl WriteOutcome {
    pub fn from_result(result: &str) -> Self {
        match result {
            "created" => WriteOutcome::Created,
            "updated" => WriteOutcome::Updated,
            other => WriteOutcome::Other(other.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, WriteOutcome::Created | WriteOutcome::Updated)
    }
}

impl fmt::Display for WriteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteOutcome::Created => write!(f, "created"),
            WriteOutcome::Updated => write!(f, "updated"),
            WriteOutcome::Other(result) => write!(f, "{}", result),
        }
    }
}

/// How a keyword is compared against stored labels
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MatchMode {
    /// Analyzed full-text match: any shared token counts
    #[default]
    Match,
    /// Exact label equality
    Term,
}
