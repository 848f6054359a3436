//! Embedding generation and exact nearest-neighbor search.
//!
//! The index is a flat L2 index: every query scans all vectors. A single
//! document produces at most a few thousand chunks, so exact search is both
//! fast enough and fully deterministic.

mod embedding;
mod index;

pub use embedding::{
    DEFAULT_MODEL, EmbeddingGenerator, FastEmbedGenerator, model_to_string, parse_model_name,
};
pub use index::{FlatL2Index, Neighbor, squared_l2};

// Re-export key types
pub use fastembed::{EmbeddingModel, TextEmbedding};

use thiserror::Error;

/// Errors from embedding and vector search.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VectorError {
    #[error("Embedding model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

/// Result type for vector operations.
pub type VectorResult<T> = Result<T, VectorError>;

/// Dimension of every vector produced by one embedding model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub struct VectorDimension(usize);

impl VectorDimension {
    /// Create a dimension, rejecting zero.
    pub fn new(dimension: usize) -> VectorResult<Self> {
        if dimension == 0 {
            return Err(VectorError::InvalidQuery(
                "vector dimension must be greater than 0".to_string(),
            ));
        }
        Ok(Self(dimension))
    }

    /// Output dimension of AllMiniLML6V2.
    pub fn dimension_384() -> Self {
        Self(384)
    }

    /// Get the dimension as usize.
    pub fn get(&self) -> usize {
        self.0
    }

    /// Check that `vector` has this dimension.
    pub fn check(&self, vector: &[f32]) -> VectorResult<()> {
        if vector.len() != self.0 {
            return Err(VectorError::InvalidQuery(format!(
                "dimension mismatch: expected {}, got {}",
                self.0,
                vector.len()
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for VectorDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
