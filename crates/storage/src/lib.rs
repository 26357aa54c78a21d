//! Storage collaborators: the photo index and the object store

pub mod index;
pub mod memory;
pub mod object_store;
pub mod opensearch;
pub mod s3;

pub use index::{LabelQuery, SearchIndex};
pub use memory::MemoryIndex;
pub use object_store::ObjectStore;
pub use opensearch::OpenSearchClient;
pub use s3::S3ObjectStore;

use photo_search_common::{AwsConfig, Result, SystemConfig};

/// Shared AWS SDK configuration for every AWS-backed collaborator
pub async fn load_aws_config(aws: &AwsConfig) -> aws_config::SdkConfig {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(aws.region.clone()));

    if let Some(endpoint) = &aws.endpoint_url {
        loader = loader.endpoint_url(endpoint.clone());
    }

    loader.load().await
}

/// Initialize the index client and object store
pub async fn initialize_storage(
    config: &SystemConfig,
    sdk_config: &aws_config::SdkConfig,
) -> Result<(OpenSearchClient, S3ObjectStore)> {
    let index = OpenSearchClient::new(&config.opensearch)?;
    let objects = S3ObjectStore::new(sdk_config, config.aws.endpoint_url.is_some());

    tracing::info!(
        index = %config.opensearch.index_name,
        region = %config.aws.region,
        "Storage collaborators initialized"
    );
    Ok((index, objects))
}
