//! # recall-index
//!
//! Named vector index management for Agent Recall.
//!
//! This crate maps index names to their on-disk artifact pairs under a
//! storage root and serves loaded indexes through a bounded LRU cache, so
//! repeated queries avoid disk I/O and re-parsing.
//!
//! ## Features
//! - create/load/list over named, persisted indexes
//! - LRU load cache (default capacity 32), whole-cache invalidation on write
//! - Metadata corruption degrades to empty records instead of failing loads
//! - Atomic artifact replacement (temp-then-rename, vector file last)

pub mod error;
pub mod manager;

pub use error::IndexError;
pub use manager::{IndexManager, DEFAULT_CACHE_CAPACITY, META_SUFFIX, VECTOR_EXT};
