//! Query tool adapters.
//!
//! Thin translation layer between an external caller (a session loop or a
//! CLI) and the index manager. Each operation is one unit of work on the
//! blocking pool; awaiting its handle is the caller's only suspension
//! point. An abandoned await lets the work run to completion with the
//! result discarded.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use recall_embeddings::EmbeddingModel;
use recall_index::{IndexError, IndexManager};
use recall_types::DocRecord;

use crate::error::ToolError;

/// Default number of matches returned by a query.
pub const DEFAULT_TOP_K: usize = 5;

/// One ranked match at the external boundary.
#[derive(Debug, Clone, Serialize)]
pub struct QueryMatch {
    /// Squared Euclidean distance (lower = more similar)
    pub score: f64,
    /// Document record stored for the matched vector
    pub metadata: DocRecord,
}

/// Read-only index operations exposed to the external task/session layer.
pub struct QueryTools<E: EmbeddingModel> {
    manager: Arc<IndexManager<E>>,
}

impl<E: EmbeddingModel> Clone for QueryTools<E> {
    fn clone(&self) -> Self {
        Self {
            manager: self.manager.clone(),
        }
    }
}

impl<E: EmbeddingModel + 'static> QueryTools<E> {
    /// Create tools over a shared manager.
    pub fn new(manager: Arc<IndexManager<E>>) -> Self {
        Self { manager }
    }

    /// List available index names, sorted ascending.
    pub async fn list_indexes(&self) -> Result<Vec<String>, ToolError> {
        let manager = self.manager.clone();
        let names = tokio::task::spawn_blocking(move || manager.list_indexes())
            .await
            .map_err(|e| ToolError::Task(e.to_string()))??;

        debug!(count = names.len(), "Listed indexes");
        Ok(names)
    }

    /// Query an index with [`DEFAULT_TOP_K`] results.
    pub async fn query_index_default(
        &self,
        name: &str,
        query: &str,
    ) -> Result<Vec<QueryMatch>, ToolError> {
        self.query_index(name, query, DEFAULT_TOP_K).await
    }

    /// Query `name` for the `k` nearest documents to `query`.
    ///
    /// Load and search run as a single blocking unit. A missing index is
    /// [`ToolError::IndexNotFound`], distinguishable from generic failure.
    pub async fn query_index(
        &self,
        name: &str,
        query: &str,
        k: usize,
    ) -> Result<Vec<QueryMatch>, ToolError> {
        debug!(index = %name, k = k, "Query request");

        let manager = self.manager.clone();
        let name_owned = name.to_string();
        let query_owned = query.to_string();

        let hits = tokio::task::spawn_blocking(move || {
            let store = manager.load_index(&name_owned).map_err(ToolError::from)?;
            store
                .search(&query_owned, k)
                .map_err(|e| ToolError::Query(IndexError::Store(e)))
        })
        .await
        .map_err(|e| ToolError::Task(e.to_string()))??;

        let matches: Vec<QueryMatch> = hits
            .into_iter()
            .map(|hit| QueryMatch {
                score: hit.score as f64,
                metadata: hit.metadata,
            })
            .collect();

        info!(index = %name, results = matches.len(), "Query complete");
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recall_embeddings::{Embedding, EmbeddingError, ModelInfo};
    use serde_json::Value;
    use tempfile::TempDir;

    /// Deterministic embedder: projects the first `dimension` bytes of the
    /// text into a vector, zero-padded.
    struct MockEmbedder {
        info: ModelInfo,
    }

    impl MockEmbedder {
        fn new(dimension: usize) -> Self {
            Self {
                info: ModelInfo {
                    name: "mock-embedder".to_string(),
                    dimension,
                    max_sequence_length: 16,
                },
            }
        }
    }

    impl EmbeddingModel for MockEmbedder {
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

    fn setup(temp: &TempDir) -> QueryTools<MockEmbedder> {
        let manager =
            IndexManager::new(temp.path(), Arc::new(MockEmbedder::new(4))).unwrap();
        QueryTools::new(Arc::new(manager))
    }

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_list_empty() {
        let temp = TempDir::new().unwrap();
        let tools = setup(&temp);
        assert!(tools.list_indexes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_after_create() {
        let temp = TempDir::new().unwrap();
        let manager =
            Arc::new(IndexManager::new(temp.path(), Arc::new(MockEmbedder::new(4))).unwrap());
        let tools = QueryTools::new(manager.clone());

        manager.create_index("b", &texts(&["x"]), None).unwrap();
        manager.create_index("a", &texts(&["y"]), None).unwrap();

        assert_eq!(tools.list_indexes().await.unwrap(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_query_returns_ranked_matches() {
        let temp = TempDir::new().unwrap();
        let manager =
            Arc::new(IndexManager::new(temp.path(), Arc::new(MockEmbedder::new(4))).unwrap());
        let tools = QueryTools::new(manager.clone());

        manager
            .create_index("docs", &texts(&["cat", "dog", "car"]), None)
            .unwrap();

        let matches = tools.query_index("docs", "cat", 2).await.unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].score, 0.0);
        assert_eq!(
            matches[0].metadata.get("text"),
            Some(&Value::String("cat".into()))
        );
        assert!(matches[0].score <= matches[1].score);
    }

    #[tokio::test]
    async fn test_query_missing_is_distinguishable() {
        let temp = TempDir::new().unwrap();
        let tools = setup(&temp);

        let result = tools.query_index("missing", "anything", 5).await;
        assert!(matches!(result, Err(ToolError::IndexNotFound(name)) if name == "missing"));
    }

    #[tokio::test]
    async fn test_query_default_k() {
        let temp = TempDir::new().unwrap();
        let manager =
            Arc::new(IndexManager::new(temp.path(), Arc::new(MockEmbedder::new(4))).unwrap());
        let tools = QueryTools::new(manager.clone());

        let many: Vec<String> = (0..8).map(|i| format!("doc{i}")).collect();
        manager.create_index("docs", &many, None).unwrap();

        let matches = tools.query_index_default("docs", "doc0").await.unwrap();
        assert_eq!(matches.len(), DEFAULT_TOP_K);
    }

    #[tokio::test]
    async fn test_concurrent_queries_share_cache() {
        let temp = TempDir::new().unwrap();
        let manager =
            Arc::new(IndexManager::new(temp.path(), Arc::new(MockEmbedder::new(4))).unwrap());
        let tools = QueryTools::new(manager.clone());

        manager
            .create_index("docs", &texts(&["cat", "dog"]), None)
            .unwrap();

        let (a, b) = tokio::join!(
            tools.query_index("docs", "cat", 1),
            tools.query_index("docs", "dog", 1)
        );
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(manager.cache_stats().0, 1);
    }
}
