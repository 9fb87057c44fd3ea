// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session store adapter trait: TTL-backed key-value persistence of
//! conversation state.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::SawariError;
use crate::state::ConversationState;
use crate::traits::adapter::PluginAdapter;

/// TTL-backed key-value store holding one serialized conversation state
/// per user identifier.
///
/// Semantics are plain get/set-with-TTL: no locking primitive is exposed,
/// and callers persist by whole-state replacement. `get` refreshes the TTL
/// so active conversations do not expire mid-flow while idle ones do.
#[async_trait]
pub trait SessionStore: PluginAdapter {
    /// Loads the state for a user, extending its TTL on hit.
    /// An expired entry is indistinguishable from an absent one.
    async fn get(&self, user_id: &str) -> Result<Option<ConversationState>, SawariError>;

    /// Replaces the stored state for a user, resetting its TTL.
    async fn put(
        &self,
        user_id: &str,
        state: &ConversationState,
        ttl: Duration,
    ) -> Result<(), SawariError>;

    /// Deletes the session. Returns whether an entry existed.
    async fn delete(&self, user_id: &str) -> Result<bool, SawariError>;

    /// Extends the TTL of an existing session without rewriting it.
    /// Returns false when no live entry exists.
    async fn extend_ttl(&self, user_id: &str, ttl: Duration) -> Result<bool, SawariError>;

    /// Lists user ids with live sessions.
    async fn active_user_ids(&self) -> Result<Vec<String>, SawariError>;
}
