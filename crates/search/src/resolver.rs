//! Request-scoped query resolution
//!
//! One request walks `Received → Validated → Disambiguated → Searched →
//! LinksGenerated → Responded`. Stages that produce nothing to act on (no
//! query text, no keywords, no hits) jump straight to `Responded` with an
//! empty result list. Any error aborts the whole request with a 500.

use futures::future::try_join_all;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

use photo_search_common::{PhotoDocument, PhotoSearchError, Result, SearchConfig, SearchResult};
use photo_search_storage::{ObjectStore, SearchIndex};

use crate::intent::IntentResolver;
use crate::keywords::extract_keywords;
use crate::query::search_photos;
use crate::response::SearchResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverStage {
    Received,
    Validated,
    Disambiguated,
    Searched,
    LinksGenerated,
    Responded,
}

impl fmt::Display for ResolverStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResolverStage::Received => "received",
            ResolverStage::Validated => "validated",
            ResolverStage::Disambiguated => "disambiguated",
            ResolverStage::Searched => "searched",
            ResolverStage::LinksGenerated => "links_generated",
            ResolverStage::Responded => "responded",
        };
        f.write_str(name)
    }
}

/// Answers free-text photo searches against the shared index
pub struct QueryResolver {
    intents: Arc<dyn IntentResolver>,
    index: Arc<dyn SearchIndex>,
    objects: Arc<dyn ObjectStore>,
    settings: SearchConfig,
}

impl QueryResolver {
    pub fn new(
        intents: Arc<dyn IntentResolver>,
        index: Arc<dyn SearchIndex>,
        objects: Arc<dyn ObjectStore>,
        settings: SearchConfig,
    ) -> Self {
        Self {
            intents,
            index,
            objects,
            settings,
        }
    }

    /// Resolve one request. Never fails; errors become a 500 response.
    #[instrument(skip(self))]
    pub async fn handle(&self, raw_query: Option<&str>) -> SearchResponse {
        enter(ResolverStage::Received);

        let query = match raw_query.map(str::trim) {
            Some(text) if !text.is_empty() => text,
            _ => {
                info!("Request without query text");
                enter(ResolverStage::Responded);
                return SearchResponse::bad_request();
            }
        };
        enter(ResolverStage::Validated);

        let response = match self.resolve(query).await {
            Ok(results) => {
                info!(results = results.len(), "Search request completed");
                SearchResponse::ok(results)
            }
            Err(e) => {
                error!("Search request failed: {}", e);
                SearchResponse::internal_error(e.to_string())
            }
        };
        enter(ResolverStage::Responded);
        response
    }

    async fn resolve(&self, query: &str) -> Result<Vec<SearchResult>> {
        let resolution = self.intents.recognize_text(query).await?;
        let keywords = extract_keywords(&resolution);
        info!("Search keywords: {:?}", keywords);
        enter(ResolverStage::Disambiguated);

        if keywords.is_empty() {
            return Ok(Vec::new());
        }

        let photos = search_photos(self.index.as_ref(), &keywords, &self.settings).await?;
        enter(ResolverStage::Searched);

        if photos.is_empty() {
            return Ok(Vec::new());
        }

        let results = self.generate_links(photos).await?;
        enter(ResolverStage::LinksGenerated);
        Ok(results)
    }

    /// All links or none
    async fn generate_links(&self, photos: Vec<PhotoDocument>) -> Result<Vec<SearchResult>> {
        let expires_in = Duration::from_secs(self.settings.link_expiry_secs);

        try_join_all(photos.into_iter().map(|photo| async move {
            let url = self
                .objects
                .presigned_get_url(&photo.bucket, &photo.object_key, expires_in)
                .await
                .map_err(|e| match e {
                    PhotoSearchError::LinkGeneration(_) => e,
                    other => PhotoSearchError::LinkGeneration(other.to_string()),
                })?;
            Ok::<_, PhotoSearchError>(SearchResult {
                url,
                labels: photo.labels,
            })
        }))
        .await
    }
}

fn enter(stage: ResolverStage) {
    debug!(%stage, "Query resolver stage");
}
