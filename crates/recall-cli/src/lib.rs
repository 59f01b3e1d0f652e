//! # recall-cli
//!
//! Command-line administration for Agent Recall indexes: build named
//! indexes from JSON text batches, list what exists, and run ad-hoc
//! semantic queries.

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands};
pub use commands::run;
