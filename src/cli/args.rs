//! CLI argument parsing using clap.
//!
//! Contains the Cli struct and Commands enum.

use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use std::path::PathBuf;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Ask questions of a single document
#[derive(Parser)]
#[command(
    name = "docqa",
    version = env!("CARGO_PKG_VERSION"),
    about = "Ask questions of a single document",
    long_about = "Upload a PDF or text document, then ask questions. Answers are the most relevant passages of the document, in the order the document presents them.",
    next_line_help = true,
    styles = clap_cargo_style(),
    after_help = "Quick Start:\n  $ docqa init\n  $ docqa ask notes.pdf \"Explain ultrasonic machining\"\n  $ docqa ask notes.pdf                # interactive\n  $ docqa export notes.pdf -o chunks.txt"
)]
pub struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize configuration
    #[command(about = "Set up .docqa directory with default configuration")]
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Show current configuration settings
    #[command(about = "Display active settings")]
    Config,

    /// Upload a document and ask questions about it
    #[command(
        about = "Answer questions from a document",
        long_about = "Extract, segment and embed the document, then answer the question.\n\nWithout a question, reads questions from stdin until EOF or :quit.\nIn that mode, :load <FILE> replaces the current document.",
        after_help = "Examples:\n  docqa ask paper.pdf \"what method is used?\"\n  docqa ask notes.txt --top-k 4 --json \"define entropy\"\n  docqa ask scanned.pdf"
    )]
    Ask {
        /// Document to load (PDF or text)
        file: PathBuf,

        /// Question to answer; omit for interactive mode
        #[arg(value_name = "QUESTION")]
        question: Vec<String>,

        /// Chunks retrieved per question (overrides settings)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Output the answer and its source chunks as JSON
        #[arg(long)]
        json: bool,

        /// Disable progress bars
        #[arg(long)]
        no_progress: bool,
    },

    /// Export document chunks to a flat text file
    #[command(
        about = "Export document chunks as [CHUNK i] blocks",
        after_help = "Examples:\n  docqa export sample.pdf\n  docqa export sample.pdf -o out/chunks.txt --window 500"
    )]
    Export {
        /// Document to export (PDF or text)
        file: PathBuf,

        /// Output file
        #[arg(short, long, default_value = crate::documents::DEFAULT_EXPORT_FILE)]
        output: PathBuf,

        /// Window size in characters (overrides settings)
        #[arg(long)]
        window: Option<usize>,
    },

    /// Show how a document is segmented for questions
    #[command(about = "List the chunks a document is split into")]
    Chunks {
        /// Document to segment (PDF or text)
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_ask_collects_question_words() {
        let cli = Cli::parse_from(["docqa", "ask", "doc.pdf", "what", "is", "this?", "-k", "3"]);
        match cli.command {
            Commands::Ask {
                file,
                question,
                top_k,
                ..
            } => {
                assert_eq!(file, PathBuf::from("doc.pdf"));
                assert_eq!(question.join(" "), "what is this?");
                assert_eq!(top_k, Some(3));
            }
            _ => panic!("expected ask command"),
        }
    }

    #[test]
    fn test_ask_flags_before_question() {
        let cli = Cli::parse_from(["docqa", "ask", "-k", "3", "--json", "doc.pdf", "why?"]);
        match cli.command {
            Commands::Ask {
                question,
                top_k,
                json,
                ..
            } => {
                assert_eq!(question, vec!["why?"]);
                assert_eq!(top_k, Some(3));
                assert!(json);
            }
            _ => panic!("expected ask command"),
        }
    }

    #[test]
    fn test_export_default_output() {
        let cli = Cli::parse_from(["docqa", "export", "sample.pdf"]);
        match cli.command {
            Commands::Export { output, window, .. } => {
                assert_eq!(output, PathBuf::from("chunks.txt"));
                assert_eq!(window, None);
            }
            _ => panic!("expected export command"),
        }
    }
}
