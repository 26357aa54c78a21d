//! Shaping a `PhotoDocument` for the index

use chrono::{Local, NaiveDateTime};
use std::collections::BTreeSet;

use photo_search_common::{PhotoDocument, PhotoSearchError, Result, TIMESTAMP_FORMAT};

/// Source of the ingestion timestamp
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall-clock time, offset discarded
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

pub fn build_document(
    object_key: &str,
    bucket: &str,
    labels: BTreeSet<String>,
    clock: &dyn Clock,
) -> Result<PhotoDocument> {
    if object_key.trim().is_empty() {
        return Err(PhotoSearchError::InvalidInput(
            "object key must not be empty".to_string(),
        ));
    }
    if bucket.trim().is_empty() {
        return Err(PhotoSearchError::InvalidInput(format!(
            "bucket must not be empty (key {})",
            object_key
        )));
    }

    Ok(PhotoDocument {
        object_key: object_key.to_string(),
        bucket: bucket.to_string(),
        created_timestamp: clock.now().format(TIMESTAMP_FORMAT).to_string(),
        labels,
    })
}
