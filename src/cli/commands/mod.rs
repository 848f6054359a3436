//! Command implementations for the CLI.
//!
//! Each command is implemented in its own module.

pub mod ask;
pub mod chunks;
pub mod export;
pub mod init;

use std::path::Path;

use crate::assistant::Assistant;
use crate::config::Settings;
use crate::extract::AutoExtractor;
use crate::vector::FastEmbedGenerator;

/// Read a document from disk.
pub(crate) fn read_document(path: &Path) -> std::io::Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        std::io::Error::new(e.kind(), format!("cannot read {}: {e}", path.display()))
    })
}

/// Display label for a document path.
pub(crate) fn source_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Assistant with the configured extractor and embedding model.
pub(crate) fn build_assistant(settings: &Settings) -> Result<Assistant, String> {
    let extractor = AutoExtractor::from_settings(&settings.extraction);
    let generator = FastEmbedGenerator::from_settings(&settings.embedding)
        .map_err(|e| format!("Failed to load embedding model: {e}"))?;

    Assistant::from_settings(settings, Box::new(extractor), Box::new(generator))
        .map_err(|e| e.to_string())
}

/// Assistant that never loads a model, for commands that only segment.
pub(crate) fn build_segmenting_assistant(settings: &Settings) -> Result<Assistant, String> {
    let extractor = AutoExtractor::from_settings(&settings.extraction);
    Assistant::from_settings(settings, Box::new(extractor), Box::new(NoModel))
        .map_err(|e| e.to_string())
}

/// Placeholder generator for export and chunk listing.
struct NoModel;

impl crate::vector::EmbeddingGenerator for NoModel {
    fn embed_batch(&self, _texts: &[&str]) -> crate::vector::VectorResult<Vec<Vec<f32>>> {
        Err(crate::vector::VectorError::ModelUnavailable(
            "no embedding model loaded for this command".to_string(),
        ))
    }

    fn dimension(&self) -> crate::vector::VectorDimension {
        crate::vector::VectorDimension::dimension_384()
    }
}
