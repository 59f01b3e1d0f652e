//! # recall-types
//!
//! Shared domain types for the Agent Recall system.
//!
//! This crate defines the core data structures used throughout the system:
//! - Document records: schemaless per-vector metadata
//! - Configuration: layered settings for storage, model, and cache
//!
//! ## Usage
//!
//! ```rust
//! use recall_types::{text_record, DocRecord};
//!
//! let record: DocRecord = text_record("a patient note");
//! ```

pub mod config;
pub mod document;
pub mod error;

pub use config::RecallConfig;
pub use document::{missing_record, text_record, DocRecord, MISSING_KEY, TEXT_KEY};
pub use error::RecallError;
