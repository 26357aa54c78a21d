//! OpenSearch HTTP client for the photo index
//!
//! Talks to the REST API directly: `_doc` upserts with `refresh=true` so a
//! write is searchable once the call returns, and `_search` with a boolean
//! `should` query built by [`LabelQuery`].

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use photo_search_common::{
    OpenSearchConfig, PhotoDocument, PhotoSearchError, Result, WriteOutcome,
};

use crate::index::{LabelQuery, SearchIndex};

/// `_doc` write response
#[derive(Debug, Deserialize)]
struct IndexResponse {
    result: String,
}

/// `_search` response, only the parts we read
#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: SearchHits,
}

#[derive(Debug, Default, Deserialize)]
struct SearchHits {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(rename = "_id", default)]
    id: String,

    #[serde(rename = "_source")]
    source: serde_json::Value,
}

/// OpenSearch client with connection pooling and basic auth
#[derive(Debug, Clone)]
pub struct OpenSearchClient {
    /// Scheme, host and port, e.g. "https://search-photos.es.amazonaws.com:443"
    base_url: String,

    index_name: String,

    client: Client,

    username: Option<String>,

    password: Option<String>,
}

impl OpenSearchClient {
    /// Build a client from configuration
    ///
    /// # Errors
    ///
    /// Returns `Config` if the HTTP client cannot be constructed
    #[instrument(skip_all, fields(host = %config.host, index = %config.index_name))]
    pub fn new(config: &OpenSearchConfig) -> Result<Self> {
        Self::with_base_url(config.base_url(), config)
    }

    /// Same as [`OpenSearchClient::new`] but against an explicit base URL
    pub fn with_base_url(base_url: impl Into<String>, config: &OpenSearchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| PhotoSearchError::Config(format!("Failed to build HTTP client: {}", e)))?;

        let instance = Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            index_name: config.index_name.clone(),
            client,
            username: config.username.clone(),
            password: config.password.clone(),
        };

        info!(
            "Initialized OpenSearch client: endpoint={}, index={}, timeout={}s",
            instance.base_url, instance.index_name, config.timeout_secs
        );

        Ok(instance)
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}/{}", self.base_url, path));
        match &self.username {
            Some(user) => builder.basic_auth(user, self.password.as_ref()),
            None => builder,
        }
    }

    /// Check that the cluster answers at all
    #[instrument(skip(self), fields(endpoint = %self.base_url))]
    pub async fn ping(&self) -> Result<()> {
        let response = self
            .request(Method::GET, "")
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map_err(|e| PhotoSearchError::Search(format!("OpenSearch unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(PhotoSearchError::Search(format!(
                "OpenSearch health check failed: status {}",
                response.status()
            )));
        }

        info!("OpenSearch health check passed");
        Ok(())
    }
}

#[async_trait]
impl SearchIndex for OpenSearchClient {
    #[instrument(skip(self, doc), fields(object_key = %doc.object_key, bucket = %doc.bucket))]
    async fn upsert(&self, doc: &PhotoDocument) -> Result<WriteOutcome> {
        let path = format!(
            "{}/_doc/{}",
            self.index_name,
            urlencoding::encode(doc.id())
        );

        let response = self
            .request(Method::PUT, &path)
            .query(&[("refresh", "true")])
            .json(doc)
            .send()
            .await
            .map_err(|e| PhotoSearchError::IndexWrite(format!("Failed to send index request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PhotoSearchError::IndexWrite(format!(
                "OpenSearch returned error status {}: {}",
                status, error_text
            )));
        }

        let body: IndexResponse = response.json().await.map_err(|e| {
            PhotoSearchError::IndexWrite(format!("Failed to parse index response: {}", e))
        })?;

        let outcome = WriteOutcome::from_result(&body.result);
        info!(result = %outcome, "OpenSearch index response");
        Ok(outcome)
    }

    #[instrument(skip(self, query), fields(keywords = ?query.keywords, size = query.size))]
    async fn search(&self, query: &LabelQuery) -> Result<Vec<PhotoDocument>> {
        let body = query.to_request_body();
        debug!("Sending OpenSearch query: {}", body);

        let response = self
            .request(Method::POST, &format!("{}/_search", self.index_name))
            .json(&body)
            .send()
            .await
            .map_err(|e| PhotoSearchError::Search(format!("Failed to send search request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PhotoSearchError::Search(format!(
                "OpenSearch returned error status {}: {}",
                status, error_text
            )));
        }

        let parsed: SearchResponse = response.json().await.map_err(|e| {
            PhotoSearchError::Search(format!("Failed to parse search response: {}", e))
        })?;

        let docs: Vec<PhotoDocument> = parsed
            .hits
            .hits
            .into_iter()
            .filter_map(|hit| match serde_json::from_value(hit.source) {
                Ok(doc) => Some(doc),
                Err(e) => {
                    warn!(id = %hit.id, "Skipping malformed search hit: {}", e);
                    None
                }
            })
            .collect();

        info!("OpenSearch search completed: {} hits", docs.len());
        Ok(docs)
    }
}
