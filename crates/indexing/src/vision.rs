//! Vision labeling collaborator

use async_trait::async_trait;
use aws_sdk_rekognition::error::DisplayErrorContext;
use aws_sdk_rekognition::types::{Image, S3Object};
use aws_sdk_rekognition::Client;
use tracing::{debug, instrument};

use photo_search_common::{PhotoSearchError, Result};

/// A candidate label as returned by the labeling service
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedLabel {
    pub name: String,
    /// Percent, 0..=100
    pub confidence: f32,
}

impl DetectedLabel {
    pub fn new(name: impl Into<String>, confidence: f32) -> Self {
        Self {
            name: name.into(),
            confidence,
        }
    }
}

#[async_trait]
pub trait VisionLabeler: Send + Sync {
    /// Labels for the stored image. `max_labels` and `min_confidence` are
    /// hints; callers still filter with [`select_labels`].
    async fn detect_labels(
        &self,
        bucket: &str,
        key: &str,
        max_labels: i32,
        min_confidence: f32,
    ) -> Result<Vec<DetectedLabel>>;
}

/// Apply the confidence floor and cap, lower-case the names
pub fn select_labels(labels: Vec<DetectedLabel>, min_confidence: f32, max_labels: usize) -> Vec<String> {
    labels
        .into_iter()
        .filter(|label| label.confidence >= min_confidence)
        .map(|label| label.name.trim().to_lowercase())
        .filter(|name| !name.is_empty())
        .take(max_labels)
        .collect()
}

/// Amazon Rekognition `DetectLabels` against the object in place
#[derive(Debug, Clone)]
pub struct RekognitionLabeler {
    client: Client,
}

impl RekognitionLabeler {
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            client: Client::new(sdk_config),
        }
    }
}

#[async_trait]
impl VisionLabeler for RekognitionLabeler {
    #[instrument(skip(self))]
    async fn detect_labels(
        &self,
        bucket: &str,
        key: &str,
        max_labels: i32,
        min_confidence: f32,
    ) -> Result<Vec<DetectedLabel>> {
        let image = Image::builder()
            .s3_object(S3Object::builder().bucket(bucket).name(key).build())
            .build();

        let output = self
            .client
            .detect_labels()
            .image(image)
            .max_labels(max_labels)
            .min_confidence(min_confidence)
            .send()
            .await
            .map_err(|e| {
                PhotoSearchError::Collaborator(format!(
                    "DetectLabels s3://{}/{} failed: {}",
                    bucket,
                    key,
                    DisplayErrorContext(&e)
                ))
            })?;

        let labels: Vec<DetectedLabel> = output
            .labels()
            .iter()
            .filter_map(|label| {
                label
                    .name()
                    .map(|name| DetectedLabel::new(name, label.confidence().unwrap_or_default()))
            })
            .collect();

        debug!(count = labels.len(), "Rekognition returned labels");
        Ok(labels)
    }
}
