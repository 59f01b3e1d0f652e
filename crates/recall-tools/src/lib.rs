//! # recall-tools
//!
//! Async boundary adapters for the Agent Recall core.
//!
//! A conversational session loop must never block on disk I/O or model
//! encoding. The adapters here run every index-manager call on tokio's
//! blocking pool and suspend only while awaiting the result, so the
//! caller's scheduling context stays responsive.
//!
//! ## Features
//! - `list_indexes` / `query_index` over a shared manager
//! - "No such index" surfaced distinctly from generic failures

pub mod error;
pub mod tools;

pub use error::ToolError;
pub use tools::{QueryMatch, QueryTools, DEFAULT_TOP_K};
