// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Sawari booking agent.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Sawari configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SawariConfig {
    /// Agent identity and orchestration settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Reasoning oracle endpoint settings.
    #[serde(default)]
    pub oracle: OracleConfig,

    /// Booking backend API settings.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Session store settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// Driver batch pagination settings.
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Filter normalization settings.
    #[serde(default)]
    pub filters: FiltersConfig,
}

/// Agent identity and orchestration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the agent.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Hard ceiling on plan/act round-trips per inbound message.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Overall processing deadline per inbound message, in seconds.
    #[serde(default = "default_message_deadline_secs")]
    pub message_deadline_secs: u64,

    /// Human support contact surfaced after escalation.
    #[serde(default = "default_support_contact")]
    pub support_contact: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            max_iterations: default_max_iterations(),
            message_deadline_secs: default_message_deadline_secs(),
            support_contact: default_support_contact(),
        }
    }
}

fn default_agent_name() -> String {
    "sawari".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_iterations() -> u32 {
    6
}

fn default_message_deadline_secs() -> u64 {
    30
}

fn default_support_contact() -> String {
    "+919403892230".to_string()
}

/// Reasoning oracle endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OracleConfig {
    /// Base URL of the planning service.
    #[serde(default = "default_oracle_base_url")]
    pub base_url: String,

    /// API key for the planning service. `None` requires environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Per-call timeout, in seconds.
    #[serde(default = "default_oracle_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: default_oracle_base_url(),
            api_key: None,
            timeout_secs: default_oracle_timeout_secs(),
        }
    }
}

fn default_oracle_base_url() -> String {
    "http://localhost:9100".to_string()
}

fn default_oracle_timeout_secs() -> u64 {
    20
}

/// Booking backend API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Trip creation/cancellation endpoint base URL.
    #[serde(default = "default_trip_api_url")]
    pub trip_api_url: String,

    /// Driver directory search endpoint base URL.
    #[serde(default = "default_driver_directory_url")]
    pub driver_directory_url: String,

    /// Driver availability notification endpoint base URL.
    #[serde(default = "default_notifier_url")]
    pub notifier_url: String,

    /// Per-call timeout, in seconds.
    #[serde(default = "default_backend_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            trip_api_url: default_trip_api_url(),
            driver_directory_url: default_driver_directory_url(),
            notifier_url: default_notifier_url(),
            timeout_secs: default_backend_timeout_secs(),
        }
    }
}

fn default_trip_api_url() -> String {
    "http://localhost:9200".to_string()
}

fn default_driver_directory_url() -> String {
    "http://localhost:9201".to_string()
}

fn default_notifier_url() -> String {
    "http://localhost:9202".to_string()
}

fn default_backend_timeout_secs() -> u64 {
    20
}

/// Session store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Idle TTL for a session, in seconds. Refreshed on every turn.
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            session_ttl_secs: default_session_ttl_secs(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|d| d.join("sawari/sessions.db").display().to_string())
        .unwrap_or_else(|| "sawari-sessions.db".to_string())
}

fn default_session_ttl_secs() -> u64 {
    3600
}

/// Driver batch pagination configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    /// Number of drivers requested per directory page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Hard ceiling on total drivers notified per trip.
    #[serde(default = "default_max_drivers_per_trip")]
    pub max_drivers_per_trip: u32,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_drivers_per_trip: default_max_drivers_per_trip(),
        }
    }
}

fn default_page_size() -> u32 {
    10
}

fn default_max_drivers_per_trip() -> u32 {
    50
}

/// Filter normalization configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FiltersConfig {
    /// Passenger count at or above which a tempo traveller is force-added.
    #[serde(default = "default_large_group_threshold")]
    pub large_group_threshold: u32,

    /// Passenger count at or above which an SUV is force-added.
    #[serde(default = "default_medium_group_threshold")]
    pub medium_group_threshold: u32,
}

impl Default for FiltersConfig {
    fn default() -> Self {
        Self {
            large_group_threshold: default_large_group_threshold(),
            medium_group_threshold: default_medium_group_threshold(),
        }
    }
}

fn default_large_group_threshold() -> u32 {
    8
}

fn default_medium_group_threshold() -> u32 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = SawariConfig::default();
        assert_eq!(config.agent.name, "sawari");
        assert_eq!(config.agent.max_iterations, 6);
        assert_eq!(config.store.session_ttl_secs, 3600);
        assert_eq!(config.dispatch.page_size, 10);
        assert!(config.filters.medium_group_threshold < config.filters.large_group_threshold);
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = SawariConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: SawariConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.agent.name, config.agent.name);
        assert_eq!(parsed.dispatch.max_drivers_per_trip, 50);
    }
}
