// SPDX-FileCopyrightText: 2026 Hospeda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hospeda - booking core for property rentals.
//!
//! This is the binary entry point for the Hospeda CLI.

mod status;

use clap::{Parser, Subcommand};

/// Hospeda - booking core for property rentals.
#[derive(Parser, Debug)]
#[command(name = "hospeda", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Show database row counts and an optional revenue summary.
    Status {
        /// Property to summarize revenue for (current calendar year).
        #[arg(long)]
        property: Option<i64>,
        /// Emit structured JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Print the resolved configuration.
    Config,
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("hospeda={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match hospeda_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            hospeda_config::render_errors(&errors);
            std::process::exit(1);
        }
    };
    init_tracing(&config.service.log_level);

    let result = match cli.command {
        Some(Commands::Status { property, json }) => {
            status::run_status(&config, property, json).await
        }
        Some(Commands::Config) => match toml::to_string_pretty(&config) {
            Ok(rendered) => {
                print!("{rendered}");
                Ok(())
            }
            Err(e) => Err(hospeda_core::HospedaError::Config(e.to_string())),
        },
        None => {
            println!("hospeda: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("hospeda: {e}");
        std::process::exit(1);
    }
}
