//! Photo ingestion: from an object-created notification to an indexed document
//!
//! ## Workflow
//! 1. **Metadata**: read the custom label string from the object's user metadata.
//! 2. **Vision**: ask the labeling service for labels above the confidence floor.
//! 3. **Reconcile**: merge both sources into one lower-cased, deduplicated set.
//! 4. **Shape**: stamp a `PhotoDocument` with the ingestion time.
//! 5. **Index**: upsert by object key with immediate visibility.
//!
//! Steps 1 and 2 degrade to an empty contribution on failure; step 5 failing
//! fails the record.

pub mod document;
pub mod event;
pub mod labels;
pub mod pipeline;
pub mod report;
pub mod vision;

pub use document::{build_document, Clock, FixedClock, SystemClock};
pub use event::{ObjectRef, S3Event};
pub use labels::{parse_custom_labels, reconcile};
pub use pipeline::IngestionPipeline;
pub use report::{IngestReport, RecordFailure};
pub use vision::{select_labels, DetectedLabel, RekognitionLabeler, VisionLabeler};
