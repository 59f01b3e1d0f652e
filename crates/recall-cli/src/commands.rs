//! Command execution for the recall binary.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};

use recall_embeddings::{CandleEmbedder, ModelCache};
use recall_index::IndexManager;
use recall_tools::{QueryTools, ToolError};
use recall_types::{DocRecord, RecallConfig};

use crate::cli::{Cli, Commands};

/// Run a parsed CLI invocation.
pub async fn run(cli: Cli) -> Result<()> {
    // Load configuration, then apply CLI overrides (highest precedence).
    let mut config =
        RecallConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(dir) = cli.storage_dir {
        config.storage_dir = dir;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    init_logging(&config.log_level)?;

    info!(repo = %config.model_repo, "Loading embedding model");
    let model_cache = ModelCache::for_repo(config.model_repo.clone());
    let embedder = tokio::task::spawn_blocking(move || CandleEmbedder::load(&model_cache))
        .await
        .context("Model load task panicked")?
        .context("Failed to initialize embedding model")?;

    let manager = Arc::new(
        IndexManager::with_capacity(
            config.storage_path(),
            Arc::new(embedder),
            config.cache_capacity,
        )
        .context("Failed to open index storage")?,
    );
    let tools = QueryTools::new(manager.clone());

    match cli.command {
        Commands::Create {
            name,
            texts,
            metadata,
        } => {
            let texts: Vec<String> = read_json(&texts).context("Failed to read texts file")?;
            let metadatas: Option<Vec<DocRecord>> = match metadata {
                Some(path) => Some(read_json(&path).context("Failed to read metadata file")?),
                None => None,
            };

            let count = texts.len();
            let manager = manager.clone();
            let created_name = name.clone();
            tokio::task::spawn_blocking(move || {
                manager.create_index(&created_name, &texts, metadatas)
            })
            .await
            .context("Create task panicked")?
            .context("Failed to create index")?;

            println!("Created index \"{name}\" ({count} documents)");
        }

        Commands::List => {
            for name in tools.list_indexes().await.context("Failed to list indexes")? {
                println!("{name}");
            }
        }

        Commands::Query { name, query, top_k } => {
            match tools.query_index(&name, &query, top_k).await {
                Ok(matches) => {
                    println!("{}", serde_json::to_string_pretty(&matches)?);
                }
                Err(ToolError::IndexNotFound(name)) => {
                    eprintln!("no such index: {name}");
                    std::process::exit(1);
                }
                Err(e) => {
                    // Detail goes to the log, not the user.
                    error!(error = %e, "Query failed");
                    eprintln!("query failed");
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> Result<T> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {path}"))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing {path}"))
}

fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}
