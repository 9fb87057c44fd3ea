// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sawari - a conversational outstation cab-booking agent.
//!
//! This is the binary entry point for the Sawari agent.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod chat;
mod status;

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sawari_agent::Agent;
use sawari_backend::{BackendDriverDirectory, BackendNotifier, BackendTripApi};
use sawari_config::SawariConfig;
use sawari_core::SawariError;
use sawari_oracle::HttpOracle;
use sawari_store::{FallbackSessionStore, SqliteSessionStore};

/// Sawari - a conversational outstation cab-booking agent.
#[derive(Parser, Debug)]
#[command(name = "sawari", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch an interactive booking conversation.
    Chat,
    /// Show active sessions and adapter health.
    Status,
    /// Load and validate the configuration, then exit.
    CheckConfig,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match sawari_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            sawari_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.agent.log_level.clone())),
        )
        .init();

    let result = match cli.command {
        Some(Commands::Chat) => chat::run(&config).await,
        Some(Commands::Status) => status::run(&config).await,
        Some(Commands::CheckConfig) => {
            println!("configuration OK (agent.name={})", config.agent.name);
            Ok(())
        }
        None => {
            println!("sawari: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("sawari: {e}");
        std::process::exit(1);
    }
}

/// Wires the full production adapter stack into an [`Agent`].
///
/// The session store degrades to an in-process fallback when SQLite is
/// unavailable; every other adapter is the real HTTP client.
async fn build_stack(config: &SawariConfig) -> Result<Agent, SawariError> {
    let primary = SqliteSessionStore::new(config.store.clone());
    primary.initialize().await?;
    let store = Arc::new(FallbackSessionStore::new(
        Arc::new(primary),
        Duration::from_secs(config.store.session_ttl_secs),
    ));

    let oracle = Arc::new(HttpOracle::new(&config.oracle)?);
    let trip_api = Arc::new(BackendTripApi::new(&config.backend)?);
    let directory = Arc::new(BackendDriverDirectory::new(&config.backend)?);
    let notifier = Arc::new(BackendNotifier::new(&config.backend)?);

    Ok(Agent::new(
        oracle, store, trip_api, directory, notifier, config,
    ))
}

#[cfg(test)]
mod tests {
    #[test]
    fn binary_loads_config_defaults() {
        // Verify config loads with defaults (no config file needed).
        let config = sawari_config::load_and_validate()
            .expect("default config should be valid");
        assert_eq!(config.agent.name, "sawari");
    }
}
