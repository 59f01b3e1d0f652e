//! Agent Recall CLI
//!
//! Semantic search over named, persisted document indexes.
//!
//! # Usage
//!
//! ```bash
//! recall create notes --texts notes.json [--metadata notes.meta.json]
//! recall list
//! recall query notes "how was the patient feeling" --top-k 5
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/agent-recall/config.toml)
//! 3. Environment variables (RECALL_*)
//! 4. CLI flags

use anyhow::Result;
use clap::Parser;

use recall_cli::{run, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    run(Cli::parse()).await
}
