//! Named index manager with a bounded load cache.
//!
//! The manager is the single source of truth mapping an index name to its
//! artifact pair under the storage root:
//!
//! ```text
//! NAME.vec       - serialized vector structure
//! NAME.meta.json - ordered array of document records
//! ```
//!
//! Loaded stores are cached in an LRU keyed by `(vector path, metadata
//! path, model identity)`. Any successful create clears the whole cache:
//! a query must never observe a store built from superseded files, and a
//! full clear is the simplest discipline that guarantees it.
//!
//! ## Thread Safety
//!
//! - The cache is protected by a single Mutex (lookups, inserts,
//!   evictions, clears)
//! - The embedding model is shared read-only via Arc
//! - Cached stores are immutable once built, so `Arc<VectorStore>` handles
//!   may be searched concurrently

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use lru::LruCache;
use tracing::{debug, info, warn};

use recall_embeddings::EmbeddingModel;
use recall_types::DocRecord;
use recall_vector::{codec, VectorStore};

use crate::error::IndexError;

/// Extension of the vector-structure artifact
pub const VECTOR_EXT: &str = "vec";

/// Suffix of the metadata artifact
pub const META_SUFFIX: &str = "meta.json";

/// Default number of loaded indexes kept in memory
pub const DEFAULT_CACHE_CAPACITY: usize = 32;

/// Cache key for a loaded store.
///
/// The same triple the load reads from: re-keying on model identity keeps
/// a cache shared across differently-configured managers honest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    index_path: PathBuf,
    meta_path: PathBuf,
    model: String,
}

/// Manage multiple named vector indexes saved under a storage directory.
pub struct IndexManager<E: EmbeddingModel> {
    storage_dir: PathBuf,
    embedder: Arc<E>,
    cache: Mutex<LruCache<CacheKey, Arc<VectorStore<E>>>>,
}

impl<E: EmbeddingModel> IndexManager<E> {
    /// Create a manager with the default cache capacity.
    pub fn new(storage_dir: impl Into<PathBuf>, embedder: Arc<E>) -> Result<Self, IndexError> {
        Self::with_capacity(storage_dir, embedder, DEFAULT_CACHE_CAPACITY)
    }

    /// Create a manager with an explicit cache capacity.
    ///
    /// The capacity is fixed for the manager's lifetime.
    pub fn with_capacity(
        storage_dir: impl Into<PathBuf>,
        embedder: Arc<E>,
        capacity: usize,
    ) -> Result<Self, IndexError> {
        let storage_dir = storage_dir.into();
        std::fs::create_dir_all(&storage_dir)?;

        let capacity = NonZeroUsize::new(capacity.max(1))
            .expect("capacity must be > 0 after max(1)");

        info!(path = ?storage_dir, capacity = capacity.get(), "Opened index storage");
        Ok(Self {
            storage_dir,
            embedder,
            cache: Mutex::new(LruCache::new(capacity)),
        })
    }

    /// The storage root.
    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    /// Artifact paths for a named index.
    fn paths(&self, name: &str) -> (PathBuf, PathBuf) {
        let index_path = self.storage_dir.join(format!("{name}.{VECTOR_EXT}"));
        let meta_path = self.storage_dir.join(format!("{name}.{META_SUFFIX}"));
        (index_path, meta_path)
    }

    fn cache_key(&self, index_path: &Path, meta_path: &Path) -> CacheKey {
        CacheKey {
            index_path: index_path.to_path_buf(),
            meta_path: meta_path.to_path_buf(),
            model: self.embedder.info().name.clone(),
        }
    }

    /// Build a new index from `texts` and persist it, overwriting any
    /// prior index of the same name in full.
    ///
    /// The metadata file is renamed into place before the vector file, so
    /// the index only becomes visible once both artifacts exist. The load
    /// cache is cleared afterwards so no stale store is served.
    pub fn create_index(
        &self,
        name: &str,
        texts: &[String],
        metadatas: Option<Vec<DocRecord>>,
    ) -> Result<(), IndexError> {
        let (index_path, meta_path) = self.paths(name);

        let mut store = VectorStore::new(self.embedder.clone());
        store.add_documents(texts, metadatas)?;

        write_json_atomic(&meta_path, store.documents())?;
        store.save(&index_path)?;

        self.clear_cache();

        info!(name = %name, documents = store.len(), "Created index");
        Ok(())
    }

    /// Load an index by name, from cache when possible.
    ///
    /// Fails with [`IndexError::NotFound`] if the vector-structure file
    /// does not exist. A missing or unparsable metadata file degrades to
    /// empty records rather than failing the load.
    pub fn load_index(&self, name: &str) -> Result<Arc<VectorStore<E>>, IndexError> {
        let (index_path, meta_path) = self.paths(name);
        if !index_path.exists() {
            return Err(IndexError::NotFound(name.to_string()));
        }

        let key = self.cache_key(&index_path, &meta_path);
        {
            let mut cache = self.cache.lock().expect("cache mutex poisoned");
            if let Some(store) = cache.get(&key) {
                debug!(name = %name, "Load cache hit");
                return Ok(store.clone());
            }
        }

        // Miss: read from disk outside the lock. Two racing misses both
        // load; the second insert wins, which is harmless for immutable
        // stores.
        let index = codec::load(&index_path)?;
        let documents = read_metadata(&meta_path);
        let store = Arc::new(VectorStore::from_parts(
            self.embedder.clone(),
            index,
            documents,
        ));

        let mut cache = self.cache.lock().expect("cache mutex poisoned");
        cache.put(key, store.clone());
        debug!(name = %name, vectors = store.len(), "Loaded index from disk");
        Ok(store)
    }

    /// Names of all persisted indexes, sorted ascending.
    ///
    /// Reflects on-disk state, not cache state: an index created by a
    /// concurrent writer is listable immediately.
    pub fn list_indexes(&self) -> Result<Vec<String>, IndexError> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.storage_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some(VECTOR_EXT) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Empty the load cache. Safe to call at any time.
    pub fn clear_cache(&self) {
        let mut cache = self.cache.lock().expect("cache mutex poisoned");
        cache.clear();
        debug!("Cleared index load cache");
    }

    /// Cache statistics for metrics: (current size, capacity).
    pub fn cache_stats(&self) -> (usize, usize) {
        let cache = self.cache.lock().expect("cache mutex poisoned");
        (cache.len(), cache.cap().get())
    }
}

/// Read an index's metadata records, degrading to empty on any failure.
fn read_metadata(meta_path: &Path) -> Vec<DocRecord> {
    let bytes = match std::fs::read(meta_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!(path = ?meta_path, error = %e, "No metadata file, using empty records");
            return Vec::new();
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(documents) => documents,
        Err(e) => {
            warn!(path = ?meta_path, error = %e, "Unparsable metadata, using empty records");
            Vec::new()
        }
    }
}

/// Write records as pretty-printed JSON via a temp sibling and rename.
fn write_json_atomic(path: &Path, documents: &[DocRecord]) -> Result<(), IndexError> {
    let bytes = serde_json::to_vec_pretty(documents)?;

    let mut tmp_name = path.as_os_str().to_os_string();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);

    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
