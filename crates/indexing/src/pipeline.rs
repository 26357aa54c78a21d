use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use photo_search_common::{
    IngestionConfig, PhotoDocument, PhotoSearchError, Result, WriteOutcome,
};
use photo_search_storage::{ObjectStore, SearchIndex};

use crate::document::{build_document, Clock, SystemClock};
use crate::event::{ObjectRef, S3Event};
use crate::labels::{parse_custom_labels, reconcile};
use crate::report::IngestReport;
use crate::vision::{select_labels, VisionLabeler};

/// Turns object-created notifications into indexed photo documents.
///
/// Records are independent: a failed record is reported in the batch result
/// and never stops the records after it.
pub struct IngestionPipeline {
    index: Arc<dyn SearchIndex>,
    objects: Arc<dyn ObjectStore>,
    labeler: Arc<dyn VisionLabeler>,
    clock: Arc<dyn Clock>,
    settings: IngestionConfig,
}

impl IngestionPipeline {
    pub fn new(
        index: Arc<dyn SearchIndex>,
        objects: Arc<dyn ObjectStore>,
        labeler: Arc<dyn VisionLabeler>,
        settings: IngestionConfig,
    ) -> Self {
        Self {
            index,
            objects,
            labeler,
            clock: Arc::new(SystemClock),
            settings,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Entry point for a notification batch
    pub async fn handle_event(&self, event: &S3Event) -> IngestReport {
        info!(records = event.records.len(), "Received ingestion event");
        self.ingest_batch(event.object_refs()).await
    }

    /// Process every object, keeping input order in the report
    pub async fn ingest_batch(&self, objects: Vec<ObjectRef>) -> IngestReport {
        let concurrency = self.settings.max_concurrent_records.max(1);

        let outcomes: Vec<(ObjectRef, Result<PhotoDocument>)> = stream::iter(objects)
            .map(|object| async move {
                let outcome = self.ingest_object(&object).await;
                (object, outcome)
            })
            .buffered(concurrency)
            .collect()
            .await;

        let report = IngestReport::from_outcomes(outcomes);
        if report.is_success() {
            info!(indexed = report.indexed.len(), "Ingestion batch completed");
        } else {
            error!(
                indexed = report.indexed.len(),
                failed = report.failures.len(),
                "Ingestion batch completed with failures"
            );
        }
        report
    }

    /// Metadata, vision labels, reconcile, shape, upsert
    #[instrument(skip(self), fields(bucket = %object.bucket, key = %object.key))]
    pub async fn ingest_object(&self, object: &ObjectRef) -> Result<PhotoDocument> {
        object.validate()?;
        info!("Processing file: {} from bucket: {}", object.key, object.bucket);

        let custom = degrade("custom labels", self.custom_labels(object).await)?;
        info!("Custom labels = {:?}", custom);

        let detected = degrade("vision labels", self.detected_labels(object).await)?;
        info!("Rekognition labels: {:?}", detected);

        let labels = reconcile(&detected, &custom);
        info!("All labels: {:?}", labels);

        let doc = build_document(&object.key, &object.bucket, labels, self.clock.as_ref())?;

        match self.index.upsert(&doc).await {
            Ok(WriteOutcome::Other(result)) => {
                error!("Error indexing to OpenSearch: unexpected result {}", result);
                Err(PhotoSearchError::IndexWrite(format!(
                    "Unexpected result: {}",
                    result
                )))
            }
            Ok(outcome) => {
                info!(result = %outcome, "Indexed photo document");
                Ok(doc)
            }
            Err(e) => {
                error!("Error indexing to OpenSearch: {}", e);
                Err(e)
            }
        }
    }

    /// Custom labels from object metadata; any failure is a `Collaborator` error
    async fn custom_labels(&self, object: &ObjectRef) -> Result<Vec<String>> {
        let metadata = self
            .objects
            .object_metadata(&object.bucket, &object.key)
            .await
            .map_err(as_collaborator)?;

        Ok(metadata
            .get(&self.settings.custom_labels_key)
            .map(|raw| parse_custom_labels(raw))
            .unwrap_or_default())
    }

    /// Detected labels after floor, cap and lower-casing; any failure is a `Collaborator` error
    async fn detected_labels(&self, object: &ObjectRef) -> Result<Vec<String>> {
        let labels = self
            .labeler
            .detect_labels(
                &object.bucket,
                &object.key,
                self.settings.max_labels,
                self.settings.min_confidence,
            )
            .await
            .map_err(as_collaborator)?;

        Ok(select_labels(
            labels,
            self.settings.min_confidence,
            usize::try_from(self.settings.max_labels).unwrap_or(0),
        ))
    }
}

fn as_collaborator(err: PhotoSearchError) -> PhotoSearchError {
    match err {
        PhotoSearchError::Collaborator(_) => err,
        other => PhotoSearchError::Collaborator(other.to_string()),
    }
}

/// Degradable failures become an empty contribution, anything else propagates
fn degrade<T: Default>(step: &str, result: Result<T>) -> Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(e) if e.is_degradable() => {
            warn!("Error getting {}: {}", step, e);
            Ok(T::default())
        }
        Err(e) => Err(e),
    }
}
