//! # recall-vector
//!
//! Exact nearest-neighbor vector index for Agent Recall.
//!
//! This crate stores embeddings in a flat (brute-force) index ranked by
//! squared Euclidean distance, keeps an ordered sequence of document
//! records parallel to the vectors, and persists the numeric structure in
//! a compact versioned binary format.
//!
//! ## Features
//! - Exact k-NN search (no approximation)
//! - Dimension fixed by the first inserted batch
//! - Atomic save via temp-file-then-rename
//! - Schemaless per-vector document records

pub mod codec;
pub mod error;
pub mod flat;
pub mod store;

pub use error::StoreError;
pub use flat::{FlatIndex, Neighbor};
pub use store::{SearchHit, VectorStore};
