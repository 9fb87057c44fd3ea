// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Sawari booking agent.

use thiserror::Error;

/// The primary error type used across all Sawari adapter traits and core operations.
///
/// Expected conversational conditions (a missing trip field, nothing to
/// cancel) are modelled as outcome values by the components that produce
/// them, not as variants here. This enum is reserved for genuine faults.
#[derive(Debug, Error)]
pub enum SawariError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Session store errors (database connection, query failure, serialization).
    #[error("store error: {source}")]
    Store {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Reasoning oracle errors (API failure, malformed decision payload).
    #[error("oracle error: {message}")]
    Oracle {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Backend API errors (trip creation, driver directory, notification).
    #[error("backend error: {message}")]
    Backend {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out. Treated identically to a call failure by the
    /// retry/escalation policy.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
