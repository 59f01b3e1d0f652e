//! CLI argument parsing for the recall binary.
//!
//! CLI flags override all other config sources.

use clap::{Parser, Subcommand};

use recall_tools::DEFAULT_TOP_K;

/// Agent Recall
///
/// Semantic search over named, persisted document indexes.
#[derive(Parser, Debug)]
#[command(name = "recall")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/agent-recall/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override the index storage directory
    #[arg(long, global = true)]
    pub storage_dir: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Recall commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build and persist a named index from a batch of texts
    Create {
        /// Index name
        name: String,

        /// Path to a JSON array of strings to index
        #[arg(long)]
        texts: String,

        /// Path to a JSON array of metadata objects, one per text
        #[arg(long)]
        metadata: Option<String>,
    },

    /// List available index names
    List,

    /// Query an index for the nearest documents
    Query {
        /// Index name
        name: String,

        /// Query text
        query: String,

        /// Number of matches to return
        #[arg(long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,
    },
}
