use serde::{Deserialize, Serialize};

use photo_search_common::SearchResult;

/// JSON body of a search response
///
/// Success: `{"results": [...]}`. Failure: `{"error": "...", "results": []}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default)]
    pub results: Vec<SearchResult>,
}

/// Status code plus body, independent of the HTTP layer
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResponse {
    pub status: u16,
    pub body: SearchBody,
}

impl SearchResponse {
    pub fn ok(results: Vec<SearchResult>) -> Self {
        Self {
            status: 200,
            body: SearchBody {
                error: None,
                results,
            },
        }
    }

    pub fn bad_request() -> Self {
        Self {
            status: 400,
            body: SearchBody::default(),
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self {
            status: 500,
            body: SearchBody {
                error: Some(message.into()),
                results: Vec::new(),
            },
        }
    }
}
