//! End-to-end test infrastructure for agent-recall.
//!
//! Provides a shared TestHarness and a deterministic embedder for E2E
//! tests covering the create-persist-load-search pipeline.

use std::path::PathBuf;
use std::sync::Arc;

use recall_embeddings::{Embedding, EmbeddingError, EmbeddingModel, ModelInfo};
use recall_index::IndexManager;

/// Shared test harness for E2E tests.
///
/// Provides a temp-backed storage root and a manager over a deterministic
/// embedder, so tests run without a model download.
pub struct TestHarness {
    /// Keeps temp dir alive for the lifetime of the harness
    pub _temp_dir: tempfile::TempDir,
    /// Index storage root inside the temp dir
    pub storage_dir: PathBuf,
    /// Manager over the deterministic test embedder
    pub manager: Arc<IndexManager<HashEmbedder>>,
}

impl TestHarness {
    /// Create a harness with the default cache capacity.
    pub fn new() -> Self {
        Self::with_capacity(recall_index::DEFAULT_CACHE_CAPACITY)
    }

    /// Create a harness with an explicit cache capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let storage_dir = temp_dir.path().join("indexes");

        let manager = Arc::new(
            IndexManager::with_capacity(
                &storage_dir,
                Arc::new(HashEmbedder::new(8)),
                capacity,
            )
            .expect("Failed to open test storage"),
        );

        Self {
            _temp_dir: temp_dir,
            storage_dir,
            manager,
        }
    }

    /// Owned strings from string literals.
    pub fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Deterministic embedder for tests: projects the text's bytes into a
/// fixed-dimension vector (byte value at each position, zero-padded).
/// Same text always encodes to the same vector; no model download.
pub struct HashEmbedder {
    info: ModelInfo,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            info: ModelInfo {
                name: "hash-embedder".to_string(),
                dimension,
                max_sequence_length: 64,
            },
        }
    }
}

impl EmbeddingModel for HashEmbedder {
    fn info(&self) -> &ModelInfo {
        &self.info
    }

    fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let bytes = text.as_bytes();
        let values = (0..self.info.dimension)
            .map(|i| bytes.get(i).copied().unwrap_or(0) as f32)
            .collect();
        Ok(Embedding::new(values))
    }
}
