//! `init` and `config`: write and show the settings that shape the pipeline.

use std::error::Error;
use std::fmt::Write;

use console::style;

use crate::config::{PdfBackend, Settings};
use crate::documents::SegmentProfile;

/// Write `.docqa/settings.toml` with defaults and summarize what it sets up.
pub fn run_init(force: bool) -> Result<(), Box<dyn Error>> {
    let path = Settings::init_config_file(force)?;
    println!("{} {}", style("Created").green().bold(), path.display());
    print!("{}", describe(&Settings::default()));
    Ok(())
}

/// Print the effective settings: a summary first, then the full TOML.
pub fn run_config(config: &Settings) -> Result<(), Box<dyn Error>> {
    println!("{}", style("Pipeline").cyan().bold());
    print!("{}", describe(config));
    println!();
    println!("{}", style("settings.toml").cyan().bold());
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

fn describe(settings: &Settings) -> String {
    let mut out = String::new();
    let seg = &settings.segmentation;
    let embedding = &settings.embedding;
    let extraction = &settings.extraction;

    let _ = writeln!(
        out,
        "  {:<13}{} (questions), {} (export)",
        "segmentation",
        profile(&seg.interactive),
        profile(&seg.export)
    );
    let _ = writeln!(
        out,
        "  {:<13}top {} chunks, lines under {} chars dropped",
        "retrieval", settings.retrieval.top_k, settings.answer.min_line_chars
    );
    let _ = writeln!(
        out,
        "  {:<13}{}, batches of {}, cached in {}",
        "embedding",
        embedding.model,
        embedding.batch_size,
        embedding.effective_cache_dir().display()
    );
    let pdf = match extraction.pdf_backend {
        PdfBackend::Ocr => format!(
            "OCR on every page ({} + {}, {} dpi, {})",
            extraction.pdftoppm_bin,
            extraction.tesseract_bin,
            extraction.ocr_dpi,
            extraction.ocr_language
        ),
        PdfBackend::Pdftotext => format!(
            "{} text layer, OCR at {} dpi when it is blank",
            extraction.pdftotext_bin, extraction.ocr_dpi
        ),
    };
    let _ = writeln!(out, "  {:<13}{pdf}", "pdf");
    out
}

fn profile(profile: &SegmentProfile) -> String {
    format!(
        "{}-char windows keeping > {} chars",
        profile.window_chars, profile.min_chars
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_defaults() {
        let text = describe(&Settings::default());
        assert!(text.contains("350-char windows keeping > 40 chars (questions)"));
        assert!(text.contains("300-char windows keeping > 0 chars (export)"));
        assert!(text.contains("top 8 chunks, lines under 4 chars dropped"));
        assert!(text.contains("OCR on every page (pdftoppm + tesseract, 300 dpi, eng)"));
    }

    #[test]
    fn test_describe_pdftotext_backend() {
        let mut settings = Settings::default();
        settings.extraction.pdf_backend = PdfBackend::Pdftotext;
        settings.retrieval.top_k = 3;

        let text = describe(&settings);
        assert!(text.contains("pdftotext text layer, OCR at 300 dpi when it is blank"));
        assert!(text.contains("top 3 chunks"));
    }
}
