// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user conversation state, the entity persisted by the session store.
//!
//! The orchestration loop and its sub-components are the only writers:
//! the trip lifecycle controller owns `trip`, the filter normalizer owns
//! `preferences`, the paginator owns the notification bookkeeping, and the
//! loop re-assigns the whole state atomically after a turn completes.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::prefs::PreferenceRecord;
use crate::trip::TripRecord;
use crate::types::{CustomerIdentity, ErrorTally, Turn};

/// The full conversation state for one user, serialized losslessly
/// (including turn-log order) on every save.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationState {
    /// Ordered turn log; append-only within a session's lifetime.
    pub turn_log: Vec<Turn>,
    /// Customer identity from the transport layer.
    pub identity: CustomerIdentity,
    /// Booking channel the conversation arrived on.
    pub source_channel: String,
    /// Richer pickup location object from the input channel, if any.
    pub pickup_hint: Option<serde_json::Value>,
    /// Richer drop location object from the input channel, if any.
    pub drop_hint: Option<serde_json::Value>,
    /// The active trip, if one has been committed.
    pub trip: Option<TripRecord>,
    /// Accumulated normalized preferences, carried forward across turns.
    pub preferences: PreferenceRecord,
    /// Passenger count, if the user stated one; feeds vehicle defaulting.
    pub passenger_count: Option<u32>,
    /// Driver ids already notified for the active trip.
    pub notified_driver_ids: BTreeSet<String>,
    /// Next driver-directory page to request (1-based).
    #[serde(default = "default_cursor")]
    pub pagination_cursor: u32,
    /// Fingerprint of (route, schedule, preferences) the cursor is valid for.
    pub batch_signature: Option<String>,
    /// Consecutive external-call failure tracking.
    pub error_tally: ErrorTally,
}

fn default_cursor() -> u32 {
    1
}

impl ConversationState {
    /// Creates a fresh state for a first-time user.
    pub fn new(identity: CustomerIdentity, source_channel: impl Into<String>) -> Self {
        Self {
            identity,
            source_channel: source_channel.into(),
            pagination_cursor: 1,
            ..Default::default()
        }
    }

    /// Appends a turn to the log.
    pub fn push_turn(&mut self, turn: Turn) {
        self.turn_log.push(turn);
    }

    /// Resets pagination bookkeeping for a new or changed trip.
    pub fn reset_pagination(&mut self) {
        self.notified_driver_ids.clear();
        self.pagination_cursor = 1;
        self.batch_signature = None;
    }
}
