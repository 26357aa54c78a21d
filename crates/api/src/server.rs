use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tracing::info;

use photo_search_common::Result;
use photo_search_indexing::IngestionPipeline;
use photo_search_query::QueryResolver;

use crate::middleware::logging::{get_tracing_layer, logging_middleware};
use crate::routes;

/// Orchestrators shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<QueryResolver>,
    pub pipeline: Arc<IngestionPipeline>,
}

impl AppState {
    pub fn new(resolver: QueryResolver, pipeline: IngestionPipeline) -> Self {
        Self {
            resolver: Arc::new(resolver),
            pipeline: Arc::new(pipeline),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/search",
            get(routes::search::search_photos).options(routes::search::search_preflight),
        )
        .route("/ingest", post(routes::ingest::ingest_event))
        .route("/health", get(routes::health::health_check))
        .layer(from_fn(logging_middleware))
        .layer(get_tracing_layer())
        .with_state(state)
}

pub struct PhotoSearchServer {
    state: AppState,
    addr: String,
}

impl PhotoSearchServer {
    pub fn new(state: AppState, host: &str, port: u16) -> Self {
        Self {
            state,
            addr: format!("{}:{}", host, port),
        }
    }

    pub async fn run(self) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        info!("Photo search API listening on {}", self.addr);

        axum::serve(listener, router(self.state)).await?;
        Ok(())
    }
}
