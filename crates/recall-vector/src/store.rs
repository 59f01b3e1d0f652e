//! Vector store: embeddings plus parallel document records.
//!
//! A `VectorStore` owns a flat index and the ordered metadata records for
//! its vectors, and encodes text through a shared embedding model. Content
//! is fixed once built; queries only read.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use recall_embeddings::EmbeddingModel;
use recall_types::{missing_record, text_record, DocRecord};

use crate::codec;
use crate::error::StoreError;
use crate::flat::FlatIndex;

/// A ranked search result with its document record.
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// Squared Euclidean distance (lower = more similar)
    pub score: f32,
    /// Record stored for the matched vector
    pub metadata: DocRecord,
}

/// Semantic store over one collection of documents.
pub struct VectorStore<E> {
    embedder: Arc<E>,
    index: FlatIndex,
    documents: Vec<DocRecord>,
}

impl<E: EmbeddingModel> VectorStore<E> {
    /// Create an empty store.
    pub fn new(embedder: Arc<E>) -> Self {
        Self {
            embedder,
            index: FlatIndex::new(),
            documents: Vec::new(),
        }
    }

    /// Reassemble a store from a loaded index and its records.
    pub fn from_parts(embedder: Arc<E>, index: FlatIndex, documents: Vec<DocRecord>) -> Self {
        Self {
            embedder,
            index,
            documents,
        }
    }

    /// Number of stored vectors.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the store holds no vectors.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// The fixed embedding dimension, or None before the first insert.
    pub fn dimension(&self) -> Option<usize> {
        self.index.dimension()
    }

    /// Ordered document records, parallel to the vectors.
    pub fn documents(&self) -> &[DocRecord] {
        &self.documents
    }

    /// Encode `texts` and append them with their records.
    ///
    /// The first batch fixes the dimension; later batches must match it.
    /// When `metadatas` is absent each text gets a `{"text": t}` record;
    /// when present its length must equal the text count.
    pub fn add_documents(
        &mut self,
        texts: &[String],
        metadatas: Option<Vec<DocRecord>>,
    ) -> Result<(), StoreError> {
        if let Some(ref metadatas) = metadatas {
            if metadatas.len() != texts.len() {
                return Err(StoreError::CountMismatch {
                    texts: texts.len(),
                    metadatas: metadatas.len(),
                });
            }
        }

        let vectors = self.embedder.embed_texts(texts)?;
        self.index.add_batch(&vectors)?;

        match metadatas {
            Some(metadatas) => self.documents.extend(metadatas),
            None => self
                .documents
                .extend(texts.iter().map(|t| text_record(t))),
        }

        debug!(added = texts.len(), total = self.len(), "Added documents");
        Ok(())
    }

    /// Encode `query` and return the `k` nearest documents, ascending by
    /// distance.
    ///
    /// An empty store yields an empty result; `k` beyond the stored count
    /// yields everything. A hit whose position has no record gets the
    /// `{"_missing": true}` sentinel.
    pub fn search(&self, query: &str, k: usize) -> Result<Vec<SearchHit>, StoreError> {
        let embedding = self.embedder.embed(query)?;
        let neighbors = self.index.search(&embedding.values, k)?;

        let hits = neighbors
            .into_iter()
            .map(|n| SearchHit {
                score: n.distance,
                metadata: self
                    .documents
                    .get(n.position)
                    .cloned()
                    .unwrap_or_else(missing_record),
            })
            .collect();

        Ok(hits)
    }

    /// Persist the vector structure to `path`.
    ///
    /// Records are persisted separately by the owning manager.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        codec::save(&self.index, path)
    }
}
