//! Bulk chunk export command.

use std::io::BufWriter;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::assistant::Assistant;
use crate::config::Settings;
use crate::documents::SegmentProfile;
use crate::error::{QaError, QaResult};

/// Segment a document with the export profile and write `[CHUNK i]` blocks.
pub fn run(file: PathBuf, output: PathBuf, window: Option<usize>, config: &Settings) {
    let assistant = match super::build_segmenting_assistant(config) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let mut profile = config.segmentation.export;
    if let Some(window) = window {
        profile = profile.with_window(window);
    }

    let result = super::read_document(&file)
        .map_err(QaError::from)
        .and_then(|document| export_document(&assistant, &document, &profile, &output));

    match result {
        Ok(count) => {
            tracing::info!(target: "cli", "exported {count} chunks from {}", file.display());
            println!("Exported {count} chunks to {}", output.display());
        }
        Err(e) => {
            eprintln!("Export failed: {e}");
            std::process::exit(1);
        }
    }
}

/// Export into a temporary file next to `output`, then move it into place.
///
/// `output` is only replaced once extraction and writing have succeeded.
fn export_document(
    assistant: &Assistant,
    document: &[u8],
    profile: &SegmentProfile,
    output: &Path,
) -> QaResult<usize> {
    let dir = match output.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            std::fs::create_dir_all(parent)?;
            parent
        }
        None => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(dir)?;
    let count = assistant.export_with_profile(document, profile, BufWriter::new(&mut staged))?;
    staged.persist(output).map_err(|e| e.error)?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{ExtractResult, ExtractionError, PlainTextExtractor, TextExtractor};
    use crate::vector::{EmbeddingGenerator, VectorDimension, VectorResult};
    use tempfile::TempDir;

    struct NoEmbedding;

    impl EmbeddingGenerator for NoEmbedding {
        fn embed_batch(&self, _texts: &[&str]) -> VectorResult<Vec<Vec<f32>>> {
            unreachable!("export never embeds")
        }

        fn dimension(&self) -> VectorDimension {
            VectorDimension::new(1).unwrap()
        }
    }

    struct FailingExtractor;

    impl TextExtractor for FailingExtractor {
        fn extract_text(&self, _document: &[u8]) -> ExtractResult<String> {
            Err(ExtractionError::NoPages)
        }
    }

    #[test]
    fn test_failed_extraction_keeps_previous_export() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("chunks.txt");
        std::fs::write(&output, "[CHUNK 0]\nprevious run\n\n").unwrap();

        let assistant = Assistant::new(Box::new(FailingExtractor), Box::new(NoEmbedding));
        let err = export_document(
            &assistant,
            b"%PDF-1.4",
            &SegmentProfile::export(),
            &output,
        )
        .unwrap_err();

        assert!(matches!(err, QaError::ExtractionFailed(_)));
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "[CHUNK 0]\nprevious run\n\n"
        );
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_export_replaces_output_and_creates_parents() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out").join("chunks.txt");

        let assistant = Assistant::new(Box::new(PlainTextExtractor), Box::new(NoEmbedding));
        let document = format!("{}{}", "a".repeat(10), "b".repeat(5));
        let profile = SegmentProfile::export().with_window(10);
        let count = export_document(&assistant, document.as_bytes(), &profile, &output).unwrap();

        assert_eq!(count, 2);
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "[CHUNK 0]\naaaaaaaaaa\n\n[CHUNK 1]\nbbbbb\n\n"
        );
    }
}
