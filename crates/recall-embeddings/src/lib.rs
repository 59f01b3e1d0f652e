//! # recall-embeddings
//!
//! Local embedding generation for Agent Recall using Candle.
//!
//! This crate turns text into fixed-dimension semantic vectors for index
//! construction and query encoding, without external API calls.
//!
//! ## Features
//! - Local inference via Candle (no Python, no API)
//! - all-MiniLM-L6-v2 model (384 dimensions) by default
//! - Automatic model file caching
//! - Batch embedding for efficiency

pub mod cache;
pub mod candle;
pub mod error;
pub mod model;

pub use crate::candle::CandleEmbedder;
pub use cache::{get_or_download_model, ModelCache, ModelPaths, DEFAULT_MODEL_REPO, MODEL_FILES};
pub use error::EmbeddingError;
pub use model::{Embedding, EmbeddingModel, ModelInfo};
