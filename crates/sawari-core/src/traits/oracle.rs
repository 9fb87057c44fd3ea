// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait for the reasoning oracle (the external planning service).

use async_trait::async_trait;

use crate::error::SawariError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{OracleDecision, Turn};

/// Adapter for the black-box reasoning oracle.
///
/// The oracle receives a deterministic rendering of the conversation state
/// plus the ordered turn log, and returns either a plain reply or a batch
/// of structured action requests from the fixed catalogue. The oracle is
/// never trusted with lifecycle invariants or identity fields; those are
/// enforced by the orchestration loop.
#[async_trait]
pub trait OracleAdapter: PluginAdapter {
    /// Runs one planning step.
    async fn invoke(
        &self,
        system_context: &str,
        turns: &[Turn],
    ) -> Result<OracleDecision, SawariError>;
}
