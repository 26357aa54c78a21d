use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

use photo_search_common::Result;

/// Object storage as seen by the two orchestrators
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// User metadata attached to the object. Failures are `Collaborator` errors.
    async fn object_metadata(&self, bucket: &str, key: &str) -> Result<HashMap<String, String>>;

    /// Time-limited GET link for the object. Failures are `LinkGeneration` errors.
    async fn presigned_get_url(&self, bucket: &str, key: &str, expires_in: Duration)
        -> Result<String>;
}
