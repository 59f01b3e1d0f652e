//! Exact flat vector index.
//!
//! Vectors are stored row-major in one contiguous buffer and searched by a
//! full scan over squared Euclidean distance. Exactness is the contract:
//! results are the true k nearest neighbors, ties broken by insertion
//! order.

use tracing::debug;

use recall_embeddings::Embedding;

use crate::error::StoreError;

/// A single search result: vector position and squared L2 distance.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    /// Insertion position of the matched vector
    pub position: usize,
    /// Squared Euclidean distance (lower = more similar)
    pub distance: f32,
}

/// Flat exact-match nearest-neighbor index.
///
/// The dimension is unset until the first batch is inserted; every later
/// batch must match it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatIndex {
    dimension: Option<usize>,
    data: Vec<f32>,
}

impl FlatIndex {
    /// Create an empty index with no dimension fixed yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconstruct an index from raw parts (used by the codec).
    ///
    /// `data` must hold a whole number of `dimension`-sized rows.
    pub fn from_raw(dimension: Option<usize>, data: Vec<f32>) -> Result<Self, StoreError> {
        match dimension {
            None if !data.is_empty() => Err(StoreError::Codec(
                "vector data present without a dimension".to_string(),
            )),
            Some(0) => Err(StoreError::Codec("dimension must be > 0".to_string())),
            Some(dim) if data.len() % dim != 0 => Err(StoreError::Codec(format!(
                "{} values is not a whole number of {}-dimensional rows",
                data.len(),
                dim
            ))),
            _ => Ok(Self { dimension, data }),
        }
    }

    /// The fixed dimension, or None if nothing has been inserted.
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    /// Number of stored vectors.
    pub fn len(&self) -> usize {
        match self.dimension {
            Some(dim) => self.data.len() / dim,
            None => 0,
        }
    }

    /// Whether the index holds no vectors.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw row-major vector data.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Append a batch of vectors.
    ///
    /// The first non-empty batch fixes the dimension. The whole batch is
    /// validated before anything is appended, so a failed call leaves the
    /// index unchanged.
    pub fn add_batch(&mut self, vectors: &[Embedding]) -> Result<(), StoreError> {
        let Some(first) = vectors.first() else {
            return Ok(());
        };

        let dim = self.dimension.unwrap_or_else(|| first.dimension());
        if dim == 0 {
            return Err(StoreError::DimensionMismatch {
                expected: 1,
                actual: 0,
            });
        }
        for vector in vectors {
            if vector.dimension() != dim {
                return Err(StoreError::DimensionMismatch {
                    expected: dim,
                    actual: vector.dimension(),
                });
            }
        }

        self.dimension = Some(dim);
        self.data.reserve(vectors.len() * dim);
        for vector in vectors {
            self.data.extend_from_slice(&vector.values);
        }

        debug!(added = vectors.len(), total = self.len(), "Added vectors");
        Ok(())
    }

    /// Exact k-nearest-neighbor search.
    ///
    /// Returns up to `k` results ascending by distance. An empty index
    /// yields an empty result; `k` larger than the vector count yields all
    /// of them. Equal distances keep insertion order.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, StoreError> {
        let Some(dim) = self.dimension else {
            return Ok(Vec::new());
        };
        if self.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        if query.len() != dim {
            return Err(StoreError::DimensionMismatch {
                expected: dim,
                actual: query.len(),
            });
        }

        let mut neighbors: Vec<Neighbor> = self
            .data
            .chunks_exact(dim)
            .enumerate()
            .map(|(position, row)| Neighbor {
                position,
                distance: squared_l2(query, row),
            })
            .collect();

        // Stable sort keeps insertion order for equal distances.
        neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        neighbors.truncate(k);

        debug!(k = k, found = neighbors.len(), "Search complete");
        Ok(neighbors)
    }
}

/// Squared Euclidean distance between two equal-length slices.
fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emb(values: &[f32]) -> Embedding {
        Embedding::new(values.to_vec())
    }

    #[test]
    fn test_empty_index() {
        let index = FlatIndex::new();
        assert_eq!(index.dimension(), None);
        assert_eq!(index.len(), 0);
        assert!(index.search(&[1.0, 2.0], 5).unwrap().is_empty());
    }

    #[test]
    fn test_first_batch_fixes_dimension() {
        let mut index = FlatIndex::new();
        index.add_batch(&[emb(&[1.0, 0.0]), emb(&[0.0, 1.0])]).unwrap();
        assert_eq!(index.dimension(), Some(2));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_add_batch_dimension_mismatch() {
        let mut index = FlatIndex::new();
        index.add_batch(&[emb(&[1.0, 0.0])]).unwrap();

        let result = index.add_batch(&[emb(&[1.0, 0.0, 0.0])]);
        assert!(matches!(
            result,
            Err(StoreError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        ));
        // Failed batch leaves the index unchanged.
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_mixed_batch_appends_nothing() {
        let mut index = FlatIndex::new();
        let result = index.add_batch(&[emb(&[1.0, 0.0]), emb(&[1.0])]);
        assert!(matches!(result, Err(StoreError::DimensionMismatch { .. })));
        assert_eq!(index.len(), 0);
        assert_eq!(index.dimension(), None);
    }

    #[test]
    fn test_search_ordering() {
        let mut index = FlatIndex::new();
        index
            .add_batch(&[emb(&[10.0, 0.0]), emb(&[1.0, 0.0]), emb(&[5.0, 0.0])])
            .unwrap();

        let results = index.search(&[0.0, 0.0], 3).unwrap();
        let positions: Vec<usize> = results.iter().map(|n| n.position).collect();
        assert_eq!(positions, vec![1, 2, 0]);
        for window in results.windows(2) {
            assert!(window[0].distance <= window[1].distance);
        }
        assert!(results.iter().all(|n| n.distance >= 0.0));
    }

    #[test]
    fn test_search_k_larger_than_len() {
        let mut index = FlatIndex::new();
        index.add_batch(&[emb(&[1.0]), emb(&[2.0])]).unwrap();
        let results = index.search(&[0.0], 10).unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_search_k_zero() {
        let mut index = FlatIndex::new();
        index.add_batch(&[emb(&[1.0])]).unwrap();
        assert!(index.search(&[0.0], 0).unwrap().is_empty());
    }

    #[test]
    fn test_search_query_dimension_mismatch() {
        let mut index = FlatIndex::new();
        index.add_batch(&[emb(&[1.0, 2.0])]).unwrap();
        let result = index.search(&[1.0], 1);
        assert!(matches!(result, Err(StoreError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut index = FlatIndex::new();
        // Equidistant from the origin query.
        index
            .add_batch(&[emb(&[1.0, 0.0]), emb(&[0.0, 1.0]), emb(&[-1.0, 0.0])])
            .unwrap();

        let results = index.search(&[0.0, 0.0], 3).unwrap();
        let positions: Vec<usize> = results.iter().map(|n| n.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn test_from_raw_rejects_ragged_data() {
        let result = FlatIndex::from_raw(Some(3), vec![1.0, 2.0, 3.0, 4.0]);
        assert!(matches!(result, Err(StoreError::Codec(_))));
    }

    #[test]
    fn test_from_raw_round_trip() {
        let mut index = FlatIndex::new();
        index.add_batch(&[emb(&[1.0, 2.0]), emb(&[3.0, 4.0])]).unwrap();

        let rebuilt =
            FlatIndex::from_raw(index.dimension(), index.data().to_vec()).unwrap();
        assert_eq!(rebuilt, index);
    }
}
