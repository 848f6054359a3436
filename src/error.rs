//! Errors surfaced by upload and ask.
//!
//! Every error is local to one operation. None of them touch the current
//! session: a failed upload leaves the previous document loaded.

use thiserror::Error;

use crate::extract::ExtractionError;
use crate::vector::VectorError;

#[derive(Error, Debug)]
pub enum QaError {
    #[error("Text extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("No readable content detected in the document")]
    NoContent,

    #[error("Embedding model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("No document loaded. Upload a document first")]
    NoDocumentLoaded,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl QaError {
    /// Errors the user fixes by uploading a (different) document.
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, Self::NoContent | Self::NoDocumentLoaded)
    }
}

impl From<ExtractionError> for QaError {
    fn from(err: ExtractionError) -> Self {
        Self::ExtractionFailed(err.to_string())
    }
}

impl From<VectorError> for QaError {
    fn from(err: VectorError) -> Self {
        match err {
            VectorError::ModelUnavailable(msg) => Self::ModelUnavailable(msg),
            VectorError::InvalidQuery(msg) => Self::InvalidQuery(msg),
        }
    }
}

/// Result type for question answering.
pub type QaResult<T> = Result<T, QaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_errors_map_to_taxonomy() {
        let err: QaError = VectorError::ModelUnavailable("down".into()).into();
        assert!(matches!(err, QaError::ModelUnavailable(_)));

        let err: QaError = VectorError::InvalidQuery("empty".into()).into();
        assert!(matches!(err, QaError::InvalidQuery(_)));
    }

    #[test]
    fn test_extraction_error_maps() {
        let err: QaError = ExtractionError::NoPages.into();
        assert!(matches!(err, QaError::ExtractionFailed(_)));
    }

    #[test]
    fn test_user_correctable() {
        assert!(QaError::NoDocumentLoaded.is_user_correctable());
        assert!(QaError::NoContent.is_user_correctable());
        assert!(!QaError::InvalidQuery("x".into()).is_user_correctable());
    }
}
