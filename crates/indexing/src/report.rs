use serde::{Deserialize, Serialize};

use photo_search_common::{PhotoDocument, PhotoSearchError};

use crate::event::ObjectRef;

pub const SUCCESS_MESSAGE: &str = "Successfully processed and indexed photos";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFailure {
    pub bucket: String,
    pub key: String,
    pub error: String,
}

/// Batch-level result of one ingestion trigger.
///
/// `status_code` is 200 only when every record was indexed; any failed record
/// turns the batch into a 500 while still listing what succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
    pub status_code: u16,
    pub message: String,
    pub indexed: Vec<String>,
    pub failures: Vec<RecordFailure>,
}

impl IngestReport {
    pub fn from_outcomes<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = (ObjectRef, Result<PhotoDocument, PhotoSearchError>)>,
    {
        let mut indexed = Vec::new();
        let mut failures = Vec::new();

        for (object, outcome) in outcomes {
            match outcome {
                Ok(doc) => indexed.push(doc.object_key),
                Err(e) => failures.push(RecordFailure {
                    bucket: object.bucket,
                    key: object.key,
                    error: e.to_string(),
                }),
            }
        }

        let (status_code, message) = if failures.is_empty() {
            (200, SUCCESS_MESSAGE.to_string())
        } else {
            let details: Vec<String> = failures
                .iter()
                .map(|f| format!("{}/{}: {}", f.bucket, f.key, f.error))
                .collect();
            (
                500,
                format!(
                    "Error processing photo = {} of {} records failed: {}",
                    failures.len(),
                    failures.len() + indexed.len(),
                    details.join("; ")
                ),
            )
        };

        Self {
            status_code,
            message,
            indexed,
            failures,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}
