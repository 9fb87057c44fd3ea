// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Degrading wrapper around a primary session store.
//!
//! When the primary errors, the call degrades to an in-process store for
//! the duration of the outage instead of failing the user's request. The
//! fallback holds whatever was written while the primary was down; entries
//! written before the outage are lost to the request but not corrupted.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use sawari_core::{
    AdapterType, ConversationState, HealthStatus, PluginAdapter, SawariError, SessionStore,
};

use crate::memory::MemorySessionStore;

/// Primary store with per-call degradation to an in-process fallback.
pub struct FallbackSessionStore {
    primary: Arc<dyn SessionStore + Send + Sync>,
    fallback: MemorySessionStore,
}

impl FallbackSessionStore {
    pub fn new(primary: Arc<dyn SessionStore + Send + Sync>, ttl_default: Duration) -> Self {
        Self {
            primary,
            fallback: MemorySessionStore::new(ttl_default),
        }
    }
}

#[async_trait]
impl PluginAdapter for FallbackSessionStore {
    fn name(&self) -> &str {
        "fallback"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::SessionStore
    }

    async fn health_check(&self) -> Result<HealthStatus, SawariError> {
        match self.primary.health_check().await {
            Ok(HealthStatus::Healthy) => Ok(HealthStatus::Healthy),
            Ok(status) => Ok(status),
            Err(e) => Ok(HealthStatus::Degraded(format!(
                "primary store unavailable, serving from memory: {e}"
            ))),
        }
    }

    async fn shutdown(&self) -> Result<(), SawariError> {
        self.fallback.shutdown().await?;
        self.primary.shutdown().await
    }
}

#[async_trait]
impl SessionStore for FallbackSessionStore {
    async fn get(&self, user_id: &str) -> Result<Option<ConversationState>, SawariError> {
        match self.primary.get(user_id).await {
            Ok(Some(state)) => Ok(Some(state)),
            // A miss in the primary may still be a hit in the fallback if
            // the session was written during an outage.
            Ok(None) => self.fallback.get(user_id).await,
            Err(e) => {
                warn!(error = %e, "primary store get failed; degrading to memory");
                self.fallback.get(user_id).await
            }
        }
    }

    async fn put(
        &self,
        user_id: &str,
        state: &ConversationState,
        ttl: Duration,
    ) -> Result<(), SawariError> {
        match self.primary.put(user_id, state, ttl).await {
            Ok(()) => {
                // Drop any stale outage copy so the primary wins next read.
                let _ = self.fallback.delete(user_id).await;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "primary store put failed; degrading to memory");
                self.fallback.put(user_id, state, ttl).await
            }
        }
    }

    async fn delete(&self, user_id: &str) -> Result<bool, SawariError> {
        let fallback_deleted = self.fallback.delete(user_id).await?;
        match self.primary.delete(user_id).await {
            Ok(primary_deleted) => Ok(primary_deleted || fallback_deleted),
            Err(e) => {
                warn!(error = %e, "primary store delete failed");
                Ok(fallback_deleted)
            }
        }
    }

    async fn extend_ttl(&self, user_id: &str, ttl: Duration) -> Result<bool, SawariError> {
        match self.primary.extend_ttl(user_id, ttl).await {
            Ok(true) => Ok(true),
            Ok(false) => self.fallback.extend_ttl(user_id, ttl).await,
            Err(e) => {
                warn!(error = %e, "primary store extend_ttl failed; degrading to memory");
                self.fallback.extend_ttl(user_id, ttl).await
            }
        }
    }

    async fn active_user_ids(&self) -> Result<Vec<String>, SawariError> {
        match self.primary.active_user_ids().await {
            Ok(mut ids) => {
                for id in self.fallback.active_user_ids().await? {
                    if !ids.contains(&id) {
                        ids.push(id);
                    }
                }
                ids.sort();
                Ok(ids)
            }
            Err(e) => {
                warn!(error = %e, "primary store listing failed; degrading to memory");
                self.fallback.active_user_ids().await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sawari_core::CustomerIdentity;

    /// A primary that always errors, simulating a hard outage.
    struct DownStore;

    #[async_trait]
    impl PluginAdapter for DownStore {
        fn name(&self) -> &str {
            "down"
        }
        fn version(&self) -> semver::Version {
            semver::Version::new(0, 1, 0)
        }
        fn adapter_type(&self) -> AdapterType {
            AdapterType::SessionStore
        }
        async fn health_check(&self) -> Result<HealthStatus, SawariError> {
            Err(SawariError::Store {
                source: "down".into(),
            })
        }
        async fn shutdown(&self) -> Result<(), SawariError> {
            Ok(())
        }
    }

    #[async_trait]
    impl SessionStore for DownStore {
        async fn get(&self, _: &str) -> Result<Option<ConversationState>, SawariError> {
            Err(SawariError::Store {
                source: "down".into(),
            })
        }
        async fn put(
            &self,
            _: &str,
            _: &ConversationState,
            _: Duration,
        ) -> Result<(), SawariError> {
            Err(SawariError::Store {
                source: "down".into(),
            })
        }
        async fn delete(&self, _: &str) -> Result<bool, SawariError> {
            Err(SawariError::Store {
                source: "down".into(),
            })
        }
        async fn extend_ttl(&self, _: &str, _: Duration) -> Result<bool, SawariError> {
            Err(SawariError::Store {
                source: "down".into(),
            })
        }
        async fn active_user_ids(&self) -> Result<Vec<String>, SawariError> {
            Err(SawariError::Store {
                source: "down".into(),
            })
        }
    }

    fn state() -> ConversationState {
        ConversationState::new(CustomerIdentity::default(), "app")
    }

    #[tokio::test]
    async fn outage_degrades_to_memory_instead_of_failing() {
        let store =
            FallbackSessionStore::new(Arc::new(DownStore), Duration::from_secs(3600));

        store
            .put("u-1", &state(), Duration::from_secs(3600))
            .await
            .expect("put must not fail during outage");
        let loaded = store.get("u-1").await.expect("get must not fail");
        assert!(loaded.is_some());
        assert_eq!(store.active_user_ids().await.unwrap(), vec!["u-1".to_string()]);
    }

    #[tokio::test]
    async fn healthy_primary_is_preferred() {
        let primary = Arc::new(MemorySessionStore::new(Duration::from_secs(3600)));
        let store = FallbackSessionStore::new(primary.clone(), Duration::from_secs(3600));

        store
            .put("u-1", &state(), Duration::from_secs(3600))
            .await
            .unwrap();
        // The write landed in the primary, not the in-process fallback.
        assert!(primary.get("u-1").await.unwrap().is_some());
        assert!(store.get("u-1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn health_check_reports_degraded_during_outage() {
        let store =
            FallbackSessionStore::new(Arc::new(DownStore), Duration::from_secs(3600));
        match store.health_check().await.unwrap() {
            HealthStatus::Degraded(msg) => assert!(msg.contains("primary")),
            other => panic!("expected degraded, got {other:?}"),
        }
    }
}
