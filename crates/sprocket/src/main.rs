// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sprocket - conversational ordering assistant for B2B bicycle components.
//!
//! This is the binary entry point for the Sprocket service.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

mod config_cmd;
mod serve;

/// Sprocket - conversational ordering assistant.
#[derive(Parser, Debug)]
#[command(name = "sprocket", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the webhook ingress and dialog engine.
    Serve,
    /// Print the effective configuration (secrets redacted).
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match sprocket_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            sprocket_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => config_cmd::run_config(&config),
        None => {
            println!("sprocket: use --help for available commands");
        }
    }
}
