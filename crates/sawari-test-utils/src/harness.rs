// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles a complete agent stack with mock adapters and a
//! temp SQLite session store. Provides `send()` to drive the full
//! per-message pipeline in tests.

use std::sync::Arc;

use sawari_agent::Agent;
use sawari_config::SawariConfig;
use sawari_core::{InboundMessage, OracleDecision, ReplyEnvelope, SawariError};
use sawari_store::SqliteSessionStore;

use crate::mock_backend::{MockDriverDirectory, MockNotifier, MockTripApi};
use crate::mock_oracle::MockOracle;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    decisions: Vec<OracleDecision>,
    directory_total: usize,
    config: SawariConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            decisions: Vec::new(),
            directory_total: 100,
            config: SawariConfig::default(),
        }
    }

    /// Pre-load oracle decisions.
    pub fn with_oracle_decisions(mut self, decisions: Vec<OracleDecision>) -> Self {
        self.decisions = decisions;
        self
    }

    /// Set how many drivers the mock directory serves.
    pub fn with_directory_total(mut self, total: usize) -> Self {
        self.directory_total = total;
        self
    }

    /// Adjust config before the stack is assembled.
    pub fn with_config(mut self, f: impl FnOnce(&mut SawariConfig)) -> Self {
        f(&mut self.config);
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(mut self) -> Result<TestHarness, SawariError> {
        // Temp SQLite database, dropped with the harness.
        let temp_dir = tempfile::TempDir::new().map_err(|e| SawariError::Store {
            source: e.into(),
        })?;
        let db_path = temp_dir.path().join("test.db");
        self.config.store.database_path = db_path.to_string_lossy().to_string();

        let store = SqliteSessionStore::new(self.config.store.clone());
        store.initialize().await?;
        let store = Arc::new(store);

        let oracle = Arc::new(if self.decisions.is_empty() {
            MockOracle::new()
        } else {
            MockOracle::with_decisions(self.decisions)
        });
        let trip_api = Arc::new(MockTripApi::new());
        let directory = Arc::new(MockDriverDirectory::new(self.directory_total));
        let notifier = Arc::new(MockNotifier::new());

        let agent = Agent::new(
            oracle.clone(),
            store.clone(),
            trip_api.clone(),
            directory.clone(),
            notifier.clone(),
            &self.config,
        );

        Ok(TestHarness {
            agent,
            oracle,
            store,
            trip_api,
            directory,
            notifier,
            _temp_dir: temp_dir,
        })
    }
}

/// A fully-assembled agent stack over mock collaborators.
pub struct TestHarness {
    pub agent: Agent,
    pub oracle: Arc<MockOracle>,
    pub store: Arc<SqliteSessionStore>,
    pub trip_api: Arc<MockTripApi>,
    pub directory: Arc<MockDriverDirectory>,
    pub notifier: Arc<MockNotifier>,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Start building a harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Drives one message through the full pipeline for a default customer.
    pub async fn send(&self, user_id: &str, text: &str) -> Result<ReplyEnvelope, SawariError> {
        self.agent.handle_message(envelope(user_id, text)).await
    }

    /// Loads the persisted conversation state for a user.
    pub async fn state(&self, user_id: &str) -> Option<sawari_core::ConversationState> {
        use sawari_core::SessionStore;
        self.store.get(user_id).await.expect("store reachable")
    }
}

/// A default inbound envelope for tests.
pub fn envelope(user_id: &str, text: &str) -> InboundMessage {
    InboundMessage {
        user_id: user_id.to_string(),
        text: text.to_string(),
        identity: sawari_core::CustomerIdentity {
            id: format!("cust-{user_id}"),
            name: "Test Customer".into(),
            phone: "+911234567890".into(),
            profile_image: String::new(),
        },
        source_channel: "app".into(),
        pickup_hint: None,
        drop_hint: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn harness_round_trips_a_plain_reply() {
        let harness = TestHarness::builder()
            .with_oracle_decisions(vec![OracleDecision::Reply("Hello!".into())])
            .build()
            .await
            .unwrap();

        let reply = harness.send("u-1", "hi").await.unwrap();
        assert_eq!(reply.reply_text, "Hello!");
        assert!(!reply.trip_created);
        assert_eq!(harness.oracle.invocations().await, 1);
    }
}
