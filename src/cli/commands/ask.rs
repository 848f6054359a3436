//! Ask command: upload a document and answer questions.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::assistant::{Answer, Assistant, UploadProgress};
use crate::config::Settings;
use crate::error::QaError;

/// Options for the ask command.
#[derive(Debug, Clone)]
pub struct AskOptions {
    pub file: PathBuf,
    pub question: Vec<String>,
    pub top_k: Option<usize>,
    pub json: bool,
    pub show_progress: bool,
}

/// Run the ask command.
pub fn run(options: AskOptions, config: &Settings) {
    let mut assistant = match super::build_assistant(config) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    if let Some(k) = options.top_k {
        assistant = assistant.with_top_k(k);
    }

    if let Err(e) = upload(&assistant, &options.file, options.show_progress) {
        report_error(&e);
        std::process::exit(1);
    }

    if options.question.is_empty() {
        interactive(
            &assistant,
            std::io::stdin().lock(),
            options.json,
            options.show_progress,
        );
        return;
    }

    let question = options.question.join(" ");
    match assistant.ask(&question) {
        Ok(answer) => print_answer(&answer, options.json),
        Err(e) => {
            report_error(&e);
            std::process::exit(1);
        }
    }
}

/// Upload a document with an optional progress display.
fn upload(assistant: &Assistant, file: &Path, show_progress: bool) -> Result<(), QaError> {
    let document = super::read_document(file)?;
    let source = super::source_label(file);

    let bar = if show_progress {
        let bar = ProgressBar::new_spinner();
        bar.enable_steady_tick(Duration::from_millis(120));
        bar.set_message(format!("Extracting text from {source}..."));
        bar
    } else {
        ProgressBar::hidden()
    };

    let result = assistant.upload_with_progress(&document, Some(source.as_str()), |progress| {
        match progress {
            UploadProgress::Extracting => {}
            UploadProgress::Segmented { chunks } => {
                bar.set_style(
                    ProgressStyle::with_template(
                        "{msg} [{bar:30.cyan/blue}] {pos}/{len} chunks",
                    )
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=> "),
                );
                bar.set_length(chunks as u64);
                bar.set_message("Embedding");
            }
            UploadProgress::Embedding { current, .. } => bar.set_position(current as u64),
            UploadProgress::Indexed { .. } => bar.set_message("Indexed"),
        }
    });
    bar.finish_and_clear();

    let summary = result?;
    eprintln!(
        "{} {} processed, {} sections indexed",
        style("✓").green().bold(),
        source,
        summary.chunk_count
    );
    Ok(())
}

/// Read questions from `input` until EOF or `:quit`.
///
/// A failed `:load` is reported and the loop keeps the previous document.
fn interactive<R: BufRead>(assistant: &Assistant, input: R, json: bool, show_progress: bool) {
    eprintln!("Ask a question (:load <FILE> to switch documents, :status, :quit to exit)");
    prompt();

    for line in input.lines() {
        let Ok(line) = line else { break };
        let line = line.trim();

        if line == ":quit" || line == ":q" {
            break;
        }

        if line == ":status" {
            print_status(assistant);
        } else if let Some(path) = line.strip_prefix(":load ") {
            if let Err(e) = upload(assistant, Path::new(path.trim()), show_progress) {
                report_error(&e);
            }
        } else if !line.is_empty() {
            match assistant.ask(line) {
                Ok(answer) => print_answer(&answer, json),
                Err(e) => report_error(&e),
            }
        }

        prompt();
    }
}

fn print_status(assistant: &Assistant) {
    match assistant.session() {
        Some(session) => eprintln!(
            "{} ({} sections, loaded {})",
            session.source().unwrap_or("<unnamed>"),
            session.chunks().len(),
            session
                .created_at()
                .with_timezone(&chrono::Local)
                .format("%H:%M:%S")
        ),
        None => eprintln!("No document loaded."),
    }
}

fn prompt() {
    eprint!("{} ", style("?").cyan().bold());
    let _ = std::io::stderr().flush();
}

fn print_answer(answer: &Answer, json: bool) {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(answer).unwrap_or_default()
        );
        return;
    }

    if answer.is_empty() {
        eprintln!("No relevant content found for this question.");
        return;
    }

    println!("{}", style("Answer").cyan().bold());
    println!("{}\n", answer.text);
}

fn report_error(error: &QaError) {
    if error.is_user_correctable() {
        eprintln!("{} {error}", style("warning:").yellow().bold());
    } else {
        eprintln!("{} {error}", style("error:").red().bold());
    }
}
