//! Common types and utilities shared across all photo-search crates

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use error::{ErrorTier, PhotoSearchError, Result};
pub use logging::init_tracing_with_level;
pub use types::*;
