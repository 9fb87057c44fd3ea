// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock reasoning oracle for deterministic testing.
//!
//! `MockOracle` implements `OracleAdapter` with pre-configured decisions,
//! enabling fast, CI-runnable tests without a planning service.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use sawari_core::{
    ActionKind, ActionRequest, AdapterType, HealthStatus, OracleAdapter, OracleDecision,
    PluginAdapter, SawariError, Turn,
};

/// A mock oracle that returns pre-configured decisions.
///
/// Decisions are popped from a FIFO queue. When the queue is empty, a
/// default plain reply is returned. Received system contexts are recorded
/// for assertions.
pub struct MockOracle {
    decisions: Arc<Mutex<VecDeque<Result<OracleDecision, SawariError>>>>,
    contexts: Arc<Mutex<Vec<String>>>,
}

impl MockOracle {
    /// Create a new mock oracle with an empty decision queue.
    pub fn new() -> Self {
        Self {
            decisions: Arc::new(Mutex::new(VecDeque::new())),
            contexts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock oracle pre-loaded with the given decisions.
    pub fn with_decisions(decisions: Vec<OracleDecision>) -> Self {
        let oracle = Self::new();
        {
            let queue = oracle.decisions.clone();
            let mut guard = queue.try_lock().expect("fresh mutex");
            guard.extend(decisions.into_iter().map(Ok));
        }
        oracle
    }

    /// Queue a plain reply.
    pub async fn push_reply(&self, text: impl Into<String>) {
        self.decisions
            .lock()
            .await
            .push_back(Ok(OracleDecision::Reply(text.into())));
    }

    /// Queue a single-action decision.
    pub async fn push_action(&self, action: ActionKind, arguments: serde_json::Value) {
        self.decisions
            .lock()
            .await
            .push_back(Ok(OracleDecision::Act(vec![ActionRequest {
                action,
                arguments,
            }])));
    }

    /// Queue an oracle failure.
    pub async fn push_failure(&self, message: impl Into<String>) {
        self.decisions
            .lock()
            .await
            .push_back(Err(SawariError::Oracle {
                message: message.into(),
                source: None,
            }));
    }

    /// System contexts received so far, in call order.
    pub async fn contexts(&self) -> Vec<String> {
        self.contexts.lock().await.clone()
    }

    /// Number of planning calls made.
    pub async fn invocations(&self) -> usize {
        self.contexts.lock().await.len()
    }
}

impl Default for MockOracle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockOracle {
    fn name(&self) -> &str {
        "mock-oracle"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Oracle
    }

    async fn health_check(&self) -> Result<HealthStatus, SawariError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SawariError> {
        Ok(())
    }
}

#[async_trait]
impl OracleAdapter for MockOracle {
    async fn invoke(
        &self,
        system_context: &str,
        _turns: &[Turn],
    ) -> Result<OracleDecision, SawariError> {
        self.contexts.lock().await.push(system_context.to_string());
        self.decisions
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(OracleDecision::Reply("mock reply".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn default_reply_when_queue_empty() {
        let oracle = MockOracle::new();
        let decision = oracle.invoke("ctx", &[]).await.unwrap();
        assert_eq!(decision, OracleDecision::Reply("mock reply".into()));
    }

    #[tokio::test]
    async fn queued_decisions_returned_in_order() {
        let oracle = MockOracle::with_decisions(vec![
            OracleDecision::Reply("first".into()),
            OracleDecision::Reply("second".into()),
        ]);
        assert_eq!(
            oracle.invoke("a", &[]).await.unwrap(),
            OracleDecision::Reply("first".into())
        );
        assert_eq!(
            oracle.invoke("b", &[]).await.unwrap(),
            OracleDecision::Reply("second".into())
        );
        assert_eq!(oracle.contexts().await, vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn queued_failures_surface_as_errors() {
        let oracle = MockOracle::new();
        oracle.push_failure("planner down").await;
        assert!(oracle.invoke("ctx", &[]).await.is_err());
    }
}
