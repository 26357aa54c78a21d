use tracing::{debug, info, warn};

use photo_search_common::{PhotoDocument, Result, SearchConfig};
use photo_search_storage::{LabelQuery, SearchIndex};

/// Disjunctive query over `keywords`, or `None` when there is nothing to search for
pub fn build_query(keywords: &[String], settings: &SearchConfig) -> Option<LabelQuery> {
    if keywords.is_empty() {
        return None;
    }
    Some(LabelQuery::new(
        keywords.to_vec(),
        settings.match_mode,
        settings.max_results,
    ))
}

/// Build and run the label query.
///
/// No keywords means no backend call. Degradable backend failures come back
/// as an empty hit list; anything else propagates.
pub async fn search_photos(
    index: &dyn SearchIndex,
    keywords: &[String],
    settings: &SearchConfig,
) -> Result<Vec<PhotoDocument>> {
    let Some(query) = build_query(keywords, settings) else {
        debug!("No keywords extracted, skipping search");
        return Ok(Vec::new());
    };

    match index.search(&query).await {
        Ok(mut docs) => {
            docs.truncate(query.size);
            info!(hits = docs.len(), "Search returned photos");
            Ok(docs)
        }
        Err(e) if e.is_degradable() => {
            warn!("Error searching OpenSearch: {}", e);
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}
