//! # Photo Search HTTP API
//!
//! Exposes both triggers over HTTP:
//!
//! - **GET** `/search?q=...` - natural-language photo search
//! - **OPTIONS** `/search` - CORS preflight
//! - **POST** `/ingest` - object-created notification batch
//! - **GET** `/health` - liveness
//!
//! Collaborators are built once by the binary and injected through
//! [`AppState`]; handlers hold no other state.

pub mod middleware;
pub mod routes;
pub mod server;
pub mod types;

pub use server::{router, AppState, PhotoSearchServer};
pub use types::*;
