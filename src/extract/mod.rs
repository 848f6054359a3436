//! Turning uploaded document bytes into one text string.
//!
//! PDF handling shells out to poppler (`pdftotext`, `pdftoppm`) and
//! `tesseract`. Nothing here understands document structure; the output is a
//! single string per document, pages separated by newlines.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;
use thiserror::Error;

use crate::config::{ExtractionConfig, PdfBackend};

/// Errors from text extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to run {program}: {cause} (is it installed?)")]
    Spawn { program: String, cause: String },

    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("PDF rasterization produced no pages")]
    NoPages,
}

/// Result type for extraction.
pub type ExtractResult<T> = Result<T, ExtractionError>;

/// Magic bytes at the start of every PDF file.
const PDF_MAGIC: &[u8] = b"%PDF";

/// Turns raw document bytes into text.
pub trait TextExtractor: Send + Sync {
    fn extract_text(&self, document: &[u8]) -> ExtractResult<String>;
}

/// Input that already is text. Invalid UTF-8 is replaced, not rejected.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract_text(&self, document: &[u8]) -> ExtractResult<String> {
        Ok(String::from_utf8_lossy(document).into_owned())
    }
}

/// Reads the PDF text layer with `pdftotext -layout`.
#[derive(Debug, Clone)]
pub struct PdfTextExtractor {
    program: String,
}

impl PdfTextExtractor {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl TextExtractor for PdfTextExtractor {
    fn extract_text(&self, document: &[u8]) -> ExtractResult<String> {
        let work_dir = TempDir::new()?;
        let pdf_path = write_input(&work_dir, document)?;

        let mut command = Command::new(&self.program);
        command
            .arg("-layout")
            .arg("-enc")
            .arg("UTF-8")
            .arg(&pdf_path)
            .arg("-");
        let text = run_to_string(&self.program, &mut command)?;

        tracing::info!(
            target: "extract",
            "pdftotext extracted {} characters",
            text.chars().count()
        );
        Ok(text)
    }
}

/// Rasterizes every page and runs OCR on it, for scanned documents.
#[derive(Debug, Clone)]
pub struct OcrExtractor {
    pdftoppm: String,
    tesseract: String,
    dpi: u32,
    language: String,
}

impl OcrExtractor {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            pdftoppm: config.pdftoppm_bin.clone(),
            tesseract: config.tesseract_bin.clone(),
            dpi: config.ocr_dpi,
            language: config.ocr_language.clone(),
        }
    }

    fn rasterize(&self, pdf_path: &Path, work_dir: &TempDir) -> ExtractResult<Vec<PathBuf>> {
        let prefix = work_dir.path().join("page");
        let mut command = Command::new(&self.pdftoppm);
        command
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg("-png")
            .arg(pdf_path)
            .arg(&prefix);
        run_to_string(&self.pdftoppm, &mut command)?;

        // pdftoppm zero-pads page numbers to equal width, so name order is page order
        let mut pages: Vec<PathBuf> = std::fs::read_dir(work_dir.path())?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "png"))
            .collect();
        pages.sort();

        if pages.is_empty() {
            return Err(ExtractionError::NoPages);
        }
        Ok(pages)
    }

    fn ocr_page(&self, page: &Path) -> ExtractResult<String> {
        let mut command = Command::new(&self.tesseract);
        command.arg(page).arg("-").arg("-l").arg(&self.language);
        run_to_string(&self.tesseract, &mut command)
    }
}

impl TextExtractor for OcrExtractor {
    fn extract_text(&self, document: &[u8]) -> ExtractResult<String> {
        let work_dir = TempDir::new()?;
        let pdf_path = write_input(&work_dir, document)?;
        let pages = self.rasterize(&pdf_path, &work_dir)?;

        tracing::info!(
            target: "extract",
            "running OCR on {} pages at {} dpi",
            pages.len(),
            self.dpi
        );

        let mut full_text = String::new();
        for (i, page) in pages.iter().enumerate() {
            let text = self.ocr_page(page)?;
            tracing::debug!(target: "extract", "page {}: {} chars", i + 1, text.len());
            full_text.push_str(&text);
            full_text.push('\n');
        }
        Ok(full_text)
    }
}

/// Routes PDFs to the configured PDF backend and everything else to plain text.
///
/// With a fallback set, a PDF whose primary extraction is blank (a scan with
/// no text layer) goes through the fallback instead.
pub struct AutoExtractor {
    pdf: Box<dyn TextExtractor>,
    fallback: Option<Box<dyn TextExtractor>>,
}

impl AutoExtractor {
    pub fn new(pdf: Box<dyn TextExtractor>) -> Self {
        Self {
            pdf,
            fallback: None,
        }
    }

    pub fn with_fallback(mut self, fallback: Box<dyn TextExtractor>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Build from the extraction section of the settings.
    pub fn from_settings(config: &ExtractionConfig) -> Self {
        match config.pdf_backend {
            PdfBackend::Ocr => Self::new(Box::new(OcrExtractor::new(config))),
            PdfBackend::Pdftotext => {
                Self::new(Box::new(PdfTextExtractor::new(&config.pdftotext_bin)))
                    .with_fallback(Box::new(OcrExtractor::new(config)))
            }
        }
    }

    fn extract_pdf(&self, document: &[u8]) -> ExtractResult<String> {
        let text = self.pdf.extract_text(document)?;
        match &self.fallback {
            Some(fallback) if text.trim().is_empty() => {
                tracing::info!(
                    target: "extract",
                    "PDF has no text layer, falling back to OCR"
                );
                fallback.extract_text(document)
            }
            _ => Ok(text),
        }
    }
}

impl TextExtractor for AutoExtractor {
    fn extract_text(&self, document: &[u8]) -> ExtractResult<String> {
        if is_pdf(document) {
            self.extract_pdf(document)
        } else {
            PlainTextExtractor.extract_text(document)
        }
    }
}

/// Whether the bytes look like a PDF file.
pub fn is_pdf(document: &[u8]) -> bool {
    document.starts_with(PDF_MAGIC)
}

fn write_input(work_dir: &TempDir, document: &[u8]) -> ExtractResult<PathBuf> {
    let path = work_dir.path().join("input.pdf");
    std::fs::write(&path, document)?;
    Ok(path)
}

fn run_to_string(program: &str, command: &mut Command) -> ExtractResult<String> {
    let output = command.output().map_err(|e| ExtractionError::Spawn {
        program: program.to_string(),
        cause: e.to_string(),
    })?;

    if !output.status.success() {
        return Err(ExtractionError::Failed {
            program: program.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
