// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process session store with the same TTL semantics as the SQLite
//! implementation.
//!
//! Serves two roles: the degradation target when the primary store is
//! unavailable, and the store of choice in tests.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use sawari_core::{
    AdapterType, ConversationState, HealthStatus, PluginAdapter, SawariError, SessionStore,
};

struct Entry {
    state: ConversationState,
    expires_at: Instant,
}

/// DashMap-backed TTL store.
pub struct MemorySessionStore {
    entries: DashMap<String, Entry>,
    ttl_default: Duration,
}

impl MemorySessionStore {
    pub fn new(ttl_default: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl_default,
        }
    }

    /// Number of live entries (expired ones are not counted).
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .iter()
            .filter(|entry| entry.expires_at > now)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PluginAdapter for MemorySessionStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::SessionStore
    }

    async fn health_check(&self) -> Result<HealthStatus, SawariError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SawariError> {
        self.entries.clear();
        Ok(())
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, user_id: &str) -> Result<Option<ConversationState>, SawariError> {
        let now = Instant::now();
        // The guard must be released before removing an expired entry, or
        // the removal would deadlock on the same shard.
        let expired = match self.entries.get_mut(user_id) {
            Some(mut entry) if entry.expires_at > now => {
                entry.expires_at = now + self.ttl_default;
                return Ok(Some(entry.state.clone()));
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.remove(user_id);
        }
        Ok(None)
    }

    async fn put(
        &self,
        user_id: &str,
        state: &ConversationState,
        ttl: Duration,
    ) -> Result<(), SawariError> {
        self.entries.insert(
            user_id.to_string(),
            Entry {
                state: state.clone(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, user_id: &str) -> Result<bool, SawariError> {
        Ok(self.entries.remove(user_id).is_some())
    }

    async fn extend_ttl(&self, user_id: &str, ttl: Duration) -> Result<bool, SawariError> {
        let now = Instant::now();
        match self.entries.get_mut(user_id) {
            Some(mut entry) if entry.expires_at > now => {
                entry.expires_at = now + ttl;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn active_user_ids(&self) -> Result<Vec<String>, SawariError> {
        let now = Instant::now();
        let mut ids: Vec<String> = self
            .entries
            .iter()
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.key().clone())
            .collect();
        ids.sort();
        Ok(ids)
    }
}
