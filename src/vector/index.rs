//! Exact L2 nearest-neighbor index.

use rayon::prelude::*;
use serde::Serialize;

use super::{VectorDimension, VectorError, VectorResult};

/// Above this many vectors distances are computed in parallel.
const PARALLEL_SCAN_THRESHOLD: usize = 4096;

/// A query hit: position in the index and squared L2 distance to the query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor {
    pub position: usize,
    pub distance: f32,
}

/// Flat index over one document's embeddings.
///
/// Position `i` holds the vector of chunk `i`. Built once in bulk and never
/// updated; a new document gets a new index.
#[derive(Debug, Clone)]
pub struct FlatL2Index {
    dimension: VectorDimension,
    /// Row-major storage, `len * dimension` entries.
    data: Vec<f32>,
    len: usize,
}

impl FlatL2Index {
    /// Build an index over `vectors`, keeping their order.
    pub fn build<I>(dimension: VectorDimension, vectors: I) -> VectorResult<Self>
    where
        I: IntoIterator<Item = Vec<f32>>,
    {
        let mut data = Vec::new();
        let mut len = 0;

        for (position, vector) in vectors.into_iter().enumerate() {
            dimension.check(&vector).map_err(|e| {
                VectorError::InvalidQuery(format!("vector at position {position}: {e}"))
            })?;
            data.extend_from_slice(&vector);
            len += 1;
        }

        tracing::debug!(target: "index", "built flat L2 index: {len} vectors x {dimension}");

        Ok(Self {
            dimension,
            data,
            len,
        })
    }

    /// The `min(k, len)` nearest vectors to `query`, nearest first.
    ///
    /// Ties on distance go to the lower position.
    pub fn query(&self, query: &[f32], k: usize) -> VectorResult<Vec<Neighbor>> {
        if self.len == 0 {
            return Err(VectorError::InvalidQuery("index is empty".to_string()));
        }
        if k == 0 {
            return Err(VectorError::InvalidQuery("k must be greater than 0".to_string()));
        }
        self.dimension.check(query)?;

        let dim = self.dimension.get();
        let distance_to = |(position, row): (usize, &[f32])| Neighbor {
            position,
            distance: squared_l2(query, row),
        };

        let mut neighbors: Vec<Neighbor> = if self.len >= PARALLEL_SCAN_THRESHOLD {
            self.data
                .par_chunks_exact(dim)
                .enumerate()
                .map(distance_to)
                .collect()
        } else {
            self.data
                .chunks_exact(dim)
                .enumerate()
                .map(distance_to)
                .collect()
        };

        let k = k.min(self.len);
        if k < neighbors.len() {
            neighbors.select_nth_unstable_by(k - 1, compare_neighbors);
            neighbors.truncate(k);
        }
        neighbors.sort_by(compare_neighbors);

        Ok(neighbors)
    }

    /// Number of vectors in the index.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the index holds no vectors.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Dimension of every vector in the index.
    pub fn dimension(&self) -> VectorDimension {
        self.dimension
    }
}

fn compare_neighbors(a: &Neighbor, b: &Neighbor) -> std::cmp::Ordering {
    a.distance
        .total_cmp(&b.distance)
        .then(a.position.cmp(&b.position))
}

/// Squared Euclidean distance.
pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
