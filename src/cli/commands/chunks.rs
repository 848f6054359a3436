//! Segmentation preview command.

use std::path::PathBuf;

use console::style;

use crate::config::Settings;
use crate::error::QaError;

/// Print the interactive-profile chunks of a document.
pub fn run(file: PathBuf, json: bool, config: &Settings) {
    let assistant = match super::build_segmenting_assistant(config) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let chunks = match super::read_document(&file)
        .map_err(QaError::from)
        .and_then(|document| assistant.preview_chunks(&document))
    {
        Ok(chunks) => chunks,
        Err(e) => {
            eprintln!("Segmentation failed: {e}");
            std::process::exit(1);
        }
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&chunks).unwrap_or_default()
        );
        return;
    }

    if chunks.is_empty() {
        eprintln!("No readable content detected.");
        return;
    }

    for chunk in &chunks {
        println!(
            "{} {}",
            style(format!("[{}]", chunk.index)).cyan().bold(),
            style(format!("{} chars", chunk.char_count())).dim()
        );
        println!("{}\n", chunk.text);
    }
    println!(
        "{} chunks, {} characters",
        chunks.len(),
        chunks.total_chars()
    );
}
