use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, info};

use photo_search_indexing::S3Event;

use crate::{server::AppState, types::ErrorResponse};

/// Run the ingestion pipeline over an S3 notification batch
pub async fn ingest_event(State(state): State<AppState>, body: Bytes) -> Response {
    let event: S3Event = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            error!(
                error = %e,
                line = e.line(),
                column = e.column(),
                "Notification body is not a valid S3 event"
            );
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(
                    format!("Invalid JSON at line {}, column {}: {}", e.line(), e.column(), e),
                    "JSON_PARSE_ERROR",
                )),
            )
                .into_response();
        }
    };

    let report = state.pipeline.handle_event(&event).await;
    info!(status = report.status_code, "Ingestion request handled");

    let status =
        StatusCode::from_u16(report.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(report)).into_response()
}
