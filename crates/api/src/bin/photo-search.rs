//! Photo search binary entry point
//!
//! Loads configuration, builds the AWS and OpenSearch collaborators once, and
//! injects them into the ingestion pipeline and query resolver.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use photo_search_api::{AppState, PhotoSearchServer};
use photo_search_common::SystemConfig;
use photo_search_indexing::{IngestionPipeline, ObjectRef, RekognitionLabeler};
use photo_search_query::{LexIntentResolver, QueryResolver};
use photo_search_storage::{initialize_storage, load_aws_config, OpenSearchClient, S3ObjectStore};

#[derive(Parser)]
#[command(name = "photo-search")]
#[command(version)]
#[command(about = "Photo ingestion and natural-language search")]
struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(short, long, env = "PHOTO_SEARCH_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error), used when RUST_LOG is unset
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long)]
        port: Option<u16>,
    },
    /// Ingest objects from a bucket and print the batch report
    Ingest {
        #[arg(long)]
        bucket: String,

        /// Object key, repeatable
        #[arg(long = "key", required = true)]
        keys: Vec<String>,
    },
    /// Run one search and print the response
    Search {
        query: String,
    },
    /// Validate configuration
    ValidateConfig,
}

struct Collaborators {
    sdk_config: aws_config::SdkConfig,
    index: Arc<OpenSearchClient>,
    objects: Arc<S3ObjectStore>,
}

impl Collaborators {
    async fn build(config: &SystemConfig) -> Result<Self> {
        let sdk_config = load_aws_config(&config.aws).await;
        let (index, objects) = initialize_storage(config, &sdk_config).await?;
        Ok(Self {
            sdk_config,
            index: Arc::new(index),
            objects: Arc::new(objects),
        })
    }

    fn pipeline(&self, config: &SystemConfig) -> IngestionPipeline {
        IngestionPipeline::new(
            self.index.clone(),
            self.objects.clone(),
            Arc::new(RekognitionLabeler::new(&self.sdk_config)),
            config.ingestion.clone(),
        )
    }

    fn resolver(&self, config: &SystemConfig) -> Result<QueryResolver> {
        let intents = LexIntentResolver::new(&self.sdk_config, config)?;
        Ok(QueryResolver::new(
            Arc::new(intents),
            self.index.clone(),
            self.objects.clone(),
            config.search.clone(),
        ))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = cli.log_level.as_deref().unwrap_or("info");
    photo_search_common::init_tracing_with_level(log_level)?;

    info!("photo-search v{} starting", env!("CARGO_PKG_VERSION"));

    let config = SystemConfig::load(cli.config.as_deref()).map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    match cli.command.unwrap_or(Commands::Serve {
        host: None,
        port: None,
    }) {
        Commands::ValidateConfig => {
            println!("✓ Configuration is valid");
            println!("  OpenSearch: {}/{}", config.opensearch.base_url(), config.opensearch.index_name);
            println!("  Region: {}", config.aws.region);
            println!("  Match mode: {}", config.search.match_mode);
            println!(
                "  Lex bot: {}",
                if config.lex_bot().is_ok() { "configured" } else { "not configured" }
            );
            Ok(())
        }
        Commands::Ingest { bucket, keys } => {
            let collaborators = Collaborators::build(&config).await?;
            let pipeline = collaborators.pipeline(&config);

            let objects = keys
                .into_iter()
                .map(|key| ObjectRef::new(bucket.clone(), key))
                .collect();
            let report = pipeline.ingest_batch(objects).await;

            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.is_success() {
                anyhow::bail!(report.message);
            }
            Ok(())
        }
        Commands::Search { query } => {
            let collaborators = Collaborators::build(&config).await?;
            let resolver = collaborators.resolver(&config)?;

            let response = resolver.handle(Some(&query)).await;
            println!("{}", serde_json::to_string_pretty(&response.body)?);
            if response.status != 200 {
                anyhow::bail!("Search failed with status {}", response.status);
            }
            Ok(())
        }
        Commands::Serve { host, port } => {
            let mut config = config;
            if let Some(h) = host {
                config.server.host = h;
            }
            if let Some(p) = port {
                config.server.port = p;
            }
            start_server(config).await
        }
    }
}

async fn start_server(config: SystemConfig) -> Result<()> {
    let collaborators = Collaborators::build(&config).await?;

    if let Err(e) = collaborators.index.ping().await {
        error!("OpenSearch is not reachable yet: {}", e);
    }

    let state = AppState::new(collaborators.resolver(&config)?, collaborators.pipeline(&config));
    PhotoSearchServer::new(state, &config.server.host, config.server.port)
        .run()
        .await?;
    Ok(())
}
