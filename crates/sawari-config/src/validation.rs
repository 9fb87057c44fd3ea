// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as non-empty URLs, positive limits, and threshold
//! ordering.

use crate::diagnostic::ConfigError;
use crate::model::SawariConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &SawariConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    for (key, url) in [
        ("oracle.base_url", &config.oracle.base_url),
        ("backend.trip_api_url", &config.backend.trip_api_url),
        (
            "backend.driver_directory_url",
            &config.backend.driver_directory_url,
        ),
        ("backend.notifier_url", &config.backend.notifier_url),
    ] {
        if url.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("{key} must not be empty"),
            });
        } else if !url.starts_with("http://") && !url.starts_with("https://") {
            errors.push(ConfigError::Validation {
                message: format!("{key} must be an http(s) URL, got `{url}`"),
            });
        }
    }

    if config.store.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "store.database_path must not be empty".to_string(),
        });
    }

    if config.agent.max_iterations == 0 {
        errors.push(ConfigError::Validation {
            message: "agent.max_iterations must be at least 1".to_string(),
        });
    }

    if config.agent.message_deadline_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "agent.message_deadline_secs must be at least 1".to_string(),
        });
    }

    if config.dispatch.page_size == 0 {
        errors.push(ConfigError::Validation {
            message: "dispatch.page_size must be at least 1".to_string(),
        });
    }

    if config.dispatch.max_drivers_per_trip < config.dispatch.page_size {
        errors.push(ConfigError::Validation {
            message: format!(
                "dispatch.max_drivers_per_trip ({}) must be >= dispatch.page_size ({})",
                config.dispatch.max_drivers_per_trip, config.dispatch.page_size
            ),
        });
    }

    if config.filters.medium_group_threshold >= config.filters.large_group_threshold {
        errors.push(ConfigError::Validation {
            message: format!(
                "filters.medium_group_threshold ({}) must be below filters.large_group_threshold ({})",
                config.filters.medium_group_threshold, config.filters.large_group_threshold
            ),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
