//! S3 implementation of [`ObjectStore`]

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::Client;
use std::collections::HashMap;
use std::fmt::Debug;
use std::time::Duration;
use tracing::{debug, instrument};

use photo_search_common::{PhotoSearchError, Result};

use crate::object_store::ObjectStore;

#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl Debug for S3ObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3ObjectStore").finish_non_exhaustive()
    }
}

impl S3ObjectStore {
    /// `force_path_style` is needed for LocalStack/MinIO endpoints
    pub fn new(sdk_config: &aws_config::SdkConfig, force_path_style: bool) -> Self {
        let s3_config = aws_sdk_s3::config::Builder::from(sdk_config)
            .force_path_style(force_path_style)
            .build();

        Self {
            client: Client::from_conf(s3_config),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    #[instrument(skip(self))]
    async fn object_metadata(&self, bucket: &str, key: &str) -> Result<HashMap<String, String>> {
        let output = self
            .client
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                PhotoSearchError::Collaborator(format!(
                    "head_object s3://{}/{} failed: {}",
                    bucket,
                    key,
                    DisplayErrorContext(&e)
                ))
            })?;

        let metadata = output.metadata().cloned().unwrap_or_default();
        debug!(entries = metadata.len(), "Fetched object metadata");
        Ok(metadata)
    }

    #[instrument(skip(self))]
    async fn presigned_get_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String> {
        let presigning = PresigningConfig::expires_in(expires_in)
            .map_err(|e| PhotoSearchError::LinkGeneration(e.to_string()))?;

        let request = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| PhotoSearchError::LinkGeneration(DisplayErrorContext(&e).to_string()))?;

        Ok(request.uri().to_string())
    }
}
