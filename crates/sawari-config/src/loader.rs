// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./sawari.toml` > `~/.config/sawari/sawari.toml` > `/etc/sawari/sawari.toml`
//! with environment variable overrides via `SAWARI_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::SawariConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/sawari/sawari.toml` (system-wide)
/// 3. `~/.config/sawari/sawari.toml` (user XDG config)
/// 4. `./sawari.toml` (local directory)
/// 5. `SAWARI_*` environment variables
pub fn load_config() -> Result<SawariConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SawariConfig::default()))
        .merge(Toml::file("/etc/sawari/sawari.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("sawari/sawari.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("sawari.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config file specification.
pub fn load_config_from_str(toml_content: &str) -> Result<SawariConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SawariConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SawariConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SawariConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `SAWARI_STORE_SESSION_TTL_SECS`
/// must map to `store.session_ttl_secs`, not `store.session.ttl.secs`.
fn env_provider() -> Env {
    Env::prefixed("SAWARI_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: SAWARI_ORACLE_BASE_URL -> "oracle_base_url"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("oracle_", "oracle.", 1)
            .replacen("backend_", "backend.", 1)
            .replacen("store_", "store.", 1)
            .replacen("dispatch_", "dispatch.", 1)
            .replacen("filters_", "filters.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_yields_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.agent.name, "sawari");
        assert_eq!(config.dispatch.page_size, 10);
    }

    #[test]
    fn toml_overrides_defaults() {
        let config = load_config_from_str(
            r#"
            [agent]
            max_iterations = 3

            [dispatch]
            page_size = 25
            "#,
        )
        .unwrap();
        assert_eq!(config.agent.max_iterations, 3);
        assert_eq!(config.dispatch.page_size, 25);
        // Untouched sections keep defaults.
        assert_eq!(config.store.session_ttl_secs, 3600);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let result = load_config_from_str(
            r#"
            [agent]
            nmae = "typo"
            "#,
        );
        assert!(result.is_err(), "deny_unknown_fields should reject typos");
    }

    #[test]
    fn env_var_mapping_handles_underscored_keys() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("SAWARI_STORE_SESSION_TTL_SECS", "7200");
            jail.set_env("SAWARI_ORACLE_BASE_URL", "http://oracle.test");
            let config: SawariConfig = Figment::new()
                .merge(Serialized::defaults(SawariConfig::default()))
                .merge(env_provider())
                .extract()?;
            assert_eq!(config.store.session_ttl_secs, 7200);
            assert_eq!(config.oracle.base_url, "http://oracle.test");
            Ok(())
        });
    }
}
