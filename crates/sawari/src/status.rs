// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Status subcommand: active sessions and store health.

use colored::Colorize;

use sawari_config::SawariConfig;
use sawari_core::{HealthStatus, PluginAdapter, SawariError, SessionStore};
use sawari_store::{FallbackSessionStore, SqliteSessionStore};

/// Prints active sessions and the session store's health.
pub async fn run(config: &SawariConfig) -> Result<(), SawariError> {
    let primary = SqliteSessionStore::new(config.store.clone());
    primary.initialize().await?;
    let store = FallbackSessionStore::new(
        std::sync::Arc::new(primary),
        std::time::Duration::from_secs(config.store.session_ttl_secs),
    );

    match store.health_check().await? {
        HealthStatus::Healthy => println!("store: {}", "healthy".green()),
        HealthStatus::Degraded(reason) => {
            println!("store: {} ({reason})", "degraded".yellow());
        }
        HealthStatus::Unhealthy(reason) => {
            println!("store: {} ({reason})", "unhealthy".red());
        }
    }

    let sessions = store.active_user_ids().await?;
    println!("active sessions: {}", sessions.len());
    for user_id in sessions {
        println!("  {user_id}");
    }

    store.shutdown().await
}
