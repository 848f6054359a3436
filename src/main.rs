use clap::Parser;

use docqa::cli::commands::{self, ask::AskOptions};
use docqa::cli::{Cli, Commands};
use docqa::config::Settings;
use docqa::logging;

fn main() {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    let config = settings.unwrap_or_else(|e| {
        eprintln!("Configuration error: {e}");
        eprintln!("Using default configuration for now.");
        Settings::default()
    });

    logging::init_with_config(&config.logging);
    tracing::debug!(target: "cli", "effective settings: {config:?}");

    match cli.command {
        Commands::Init { force } => {
            if let Err(e) = commands::init::run_init(force) {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }

        Commands::Config => {
            if let Err(e) = commands::init::run_config(&config) {
                eprintln!("Error displaying config: {e}");
                std::process::exit(1);
            }
        }

        Commands::Ask {
            file,
            question,
            top_k,
            json,
            no_progress,
        } => commands::ask::run(
            AskOptions {
                file,
                question,
                top_k,
                json,
                show_progress: !no_progress && !json,
            },
            &config,
        ),

        Commands::Export {
            file,
            output,
            window,
        } => commands::export::run(file, output, window, &config),

        Commands::Chunks { file, json } => commands::chunks::run(file, json, &config),
    }
}
