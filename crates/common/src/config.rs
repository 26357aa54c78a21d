use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{PhotoSearchError, Result};
use crate::types::MatchMode;

/// S3 caps presigned URL validity at seven days
pub const MAX_LINK_EXPIRY_SECS: u64 = 604_800;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub opensearch: OpenSearchConfig,
    pub lex: LexConfig,
    pub aws: AwsConfig,
    pub ingestion: IngestionConfig,
    pub search: SearchConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenSearchConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub use_ssl: bool,
    pub index_name: String,
    pub timeout_secs: u64,
}

impl Default for OpenSearchConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 443,
            username: None,
            password: None,
            use_ssl: true,
            index_name: "photos".to_string(),
            timeout_secs: 30,
        }
    }
}

impl OpenSearchConfig {
    pub fn base_url(&self) -> String {
        let scheme = if self.use_ssl { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.host, self.port)
    }
}

/// Fixed bot/session identity sent with every intent-resolution request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LexConfig {
    pub bot_id: Option<String>,
    pub bot_alias_id: Option<String>,
    pub locale_id: String,
    pub session_id: String,
}

impl Default for LexConfig {
    fn default() -> Self {
        Self {
            bot_id: None,
            bot_alias_id: None,
            locale_id: "en_US".to_string(),
            session_id: "test-session".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsConfig {
    pub region: String,
    /// Endpoint override (LocalStack, MinIO)
    pub endpoint_url: Option<String>,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            endpoint_url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionConfig {
    /// Confidence floor (percent) for detected labels
    pub min_confidence: f32,
    pub max_labels: i32,
    /// Object metadata key holding the comma-separated custom labels
    pub custom_labels_key: String,
    pub max_concurrent_records: usize,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            min_confidence: 70.0,
            max_labels: 10,
            custom_labels_key: "customlabels".to_string(),
            max_concurrent_records: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub max_results: usize,
    pub match_mode: MatchMode,
    pub link_expiry_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: 100,
            match_mode: MatchMode::Match,
            link_expiry_secs: 3600,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl SystemConfig {
    /// Parse a TOML file without applying overrides or validation
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PhotoSearchError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content).map_err(|e| {
            PhotoSearchError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// File (when given), then process environment, then validation
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply environment-style overrides read through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = non_empty("OPENSEARCH_HOST") {
            self.opensearch.host = host;
        }
        if let Some(port) = non_empty("OPENSEARCH_PORT").and_then(|p| p.parse().ok()) {
            self.opensearch.port = port;
        }
        if let Some(user) = non_empty("OPENSEARCH_USER") {
            self.opensearch.username = Some(user);
        }
        if let Some(pass) = non_empty("OPENSEARCH_PASS") {
            self.opensearch.password = Some(pass);
        }
        if let Some(bot_id) = non_empty("BOT_ID") {
            self.lex.bot_id = Some(bot_id);
        }
        if let Some(alias) = non_empty("BOT_ALIAS_ID") {
            self.lex.bot_alias_id = Some(alias);
        }
        if let Some(region) = non_empty("AWS_REGION") {
            self.aws.region = region;
        }
        if let Some(endpoint) = non_empty("AWS_ENDPOINT_URL") {
            self.aws.endpoint_url = Some(endpoint);
        }
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(PhotoSearchError::Config(msg));

        if self.opensearch.host.trim().is_empty() {
            return invalid("opensearch.host must be set (or OPENSEARCH_HOST)".to_string());
        }
        if self.opensearch.port == 0 {
            return invalid("opensearch.port must be non-zero".to_string());
        }
        if self.opensearch.index_name.trim().is_empty() {
            return invalid("opensearch.index_name must not be empty".to_string());
        }
        if !(0.0..=100.0).contains(&self.ingestion.min_confidence) {
            return invalid(format!(
                "ingestion.min_confidence must be within 0..=100, got {}",
                self.ingestion.min_confidence
            ));
        }
        if self.ingestion.max_labels <= 0 {
            return invalid("ingestion.max_labels must be positive".to_string());
        }
        if self.ingestion.custom_labels_key.trim().is_empty() {
            return invalid("ingestion.custom_labels_key must not be empty".to_string());
        }
        if self.ingestion.max_concurrent_records == 0 {
            return invalid("ingestion.max_concurrent_records must be at least 1".to_string());
        }
        if self.search.max_results == 0 || self.search.max_results > 10_000 {
            return invalid(format!(
                "search.max_results must be within 1..=10000, got {}",
                self.search.max_results
            ));
        }
        if self.search.link_expiry_secs == 0 || self.search.link_expiry_secs > MAX_LINK_EXPIRY_SECS
        {
            return invalid(format!(
                "search.link_expiry_secs must be within 1..={}, got {}",
                MAX_LINK_EXPIRY_SECS, self.search.link_expiry_secs
            ));
        }
        Ok(())
    }

    /// Bot and alias ids, required only by the query side
    pub fn lex_bot(&self) -> Result<(&str, &str)> {
        match (self.lex.bot_id.as_deref(), self.lex.bot_alias_id.as_deref()) {
            (Some(bot_id), Some(alias)) => Ok((bot_id, alias)),
            _ => Err(PhotoSearchError::Config(
                "lex.bot_id and lex.bot_alias_id must be set (or BOT_ID / BOT_ALIAS_ID)"
                    .to_string(),
            )),
        }
    }
}
