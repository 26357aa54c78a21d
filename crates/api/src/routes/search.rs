use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN,
        },
        HeaderName, StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use tracing::{instrument, warn};

use photo_search_query::SearchResponse;

use crate::{server::AppState, types::SearchParams};

/// Headers attached to every `/search` response
fn cors_headers() -> [(HeaderName, &'static str); 3] {
    [
        (ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        (ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
        (ACCESS_CONTROL_ALLOW_METHODS, "OPTIONS,GET"),
    ]
}

/// Resolve `q` to matching photos.
///
/// 400 without query text, 200 with possibly empty results, 500 with an
/// `error` message when any step of the request failed. A query string that
/// cannot be read is answered like a missing query.
#[instrument(skip(state))]
pub async fn search_photos(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Response {
    let response = match params {
        Ok(Query(params)) => state.resolver.handle(params.q.as_deref()).await,
        Err(rejection) => {
            warn!("Unreadable search query string: {}", rejection);
            SearchResponse::bad_request()
        }
    };
    let status =
        StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (status, cors_headers(), Json(response.body)).into_response()
}

pub async fn search_preflight() -> Response {
    (StatusCode::OK, cors_headers()).into_response()
}
