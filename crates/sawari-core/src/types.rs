// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Sawari framework.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter in the plugin registry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Oracle,
    SessionStore,
    TripBackend,
    DriverDirectory,
    Notification,
}

// --- Message envelopes ---

/// Immutable customer identifiers supplied by the transport layer.
///
/// Never requested from the user; refreshed from each inbound envelope and
/// injected into every backend call by the orchestration loop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerIdentity {
    pub id: String,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub profile_image: String,
}

impl CustomerIdentity {
    /// True when every identifying field is empty.
    pub fn is_empty(&self) -> bool {
        self.id.is_empty() && self.name.is_empty() && self.phone.is_empty()
    }
}

/// An inbound user message, transport-agnostic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InboundMessage {
    pub user_id: String,
    pub text: String,
    #[serde(default)]
    pub identity: CustomerIdentity,
    /// Booking channel: "app", "website", or "whatsapp".
    #[serde(default = "default_source_channel")]
    pub source_channel: String,
    /// Richer pickup location object from the input channel, if any.
    #[serde(default)]
    pub pickup_hint: Option<serde_json::Value>,
    /// Richer drop location object from the input channel, if any.
    #[serde(default)]
    pub drop_hint: Option<serde_json::Value>,
}

fn default_source_channel() -> String {
    "app".to_string()
}

/// The outbound reply for one processed message.
///
/// The lifecycle flags derive from the trip outcomes recorded during the
/// turn, never from inspecting the reply text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyEnvelope {
    pub reply_text: String,
    pub trip_created: bool,
    pub trip_cancelled: bool,
}

impl ReplyEnvelope {
    /// A plain text reply with no lifecycle side effects.
    pub fn text(reply_text: impl Into<String>) -> Self {
        Self {
            reply_text: reply_text.into(),
            trip_created: false,
            trip_cancelled: false,
        }
    }
}

// --- Turn log ---

/// One entry in a session's ordered turn log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Turn {
    /// A message from the user.
    User { text: String },
    /// A plain reply from the reasoning oracle.
    Assistant { text: String },
    /// The serialized outcome of one executed action, fed back to the oracle.
    ActionResult { action: ActionKind, outcome: String },
}

// --- Oracle decision protocol ---

/// The fixed catalogue of side-effecting actions the oracle may request.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ActionKind {
    CreateTrip,
    ModifyTrip,
    CancelTrip,
    SearchAndNotifyDrivers,
}

/// A single action requested by the oracle, with its loosely-typed arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub action: ActionKind,
    #[serde(default)]
    pub arguments: serde_json::Value,
}

/// The oracle's decision for one planning step.
#[derive(Debug, Clone, PartialEq)]
pub enum OracleDecision {
    /// A plain text reply; the turn is over.
    Reply(String),
    /// One or more actions to execute before replanning.
    Act(Vec<ActionRequest>),
}

// --- External-call failure tracking ---

/// The kind of external call, used to key consecutive-failure tracking.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CallKind {
    TripCreate,
    TripCancel,
    DriverSearch,
    DriverNotify,
    Oracle,
}

/// Count of consecutive failures of the same external-call kind.
///
/// A failure of a different kind restarts the count; any success resets it
/// to zero. Persisted as part of the conversation state so the escalation
/// ladder survives across turns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorTally {
    #[serde(default)]
    pub kind: Option<CallKind>,
    #[serde(default)]
    pub count: u32,
}

impl ErrorTally {
    /// Records a failed call of the given kind.
    pub fn record_failure(&mut self, kind: CallKind) {
        if self.kind == Some(kind) {
            self.count += 1;
        } else {
            self.kind = Some(kind);
            self.count = 1;
        }
    }

    /// Records a successful call; resets the tally regardless of prior count.
    pub fn record_success(&mut self) {
        self.kind = None;
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn action_kind_wire_names_round_trip() {
        for kind in [
            ActionKind::CreateTrip,
            ActionKind::ModifyTrip,
            ActionKind::CancelTrip,
            ActionKind::SearchAndNotifyDrivers,
        ] {
            let s = kind.to_string();
            assert_eq!(ActionKind::from_str(&s).unwrap(), kind);
        }
        assert_eq!(
            ActionKind::SearchAndNotifyDrivers.to_string(),
            "search_and_notify_drivers"
        );
    }

    #[test]
    fn action_request_deserializes_without_arguments() {
        let req: ActionRequest = serde_json::from_str(r#"{"action":"cancel_trip"}"#).unwrap();
        assert_eq!(req.action, ActionKind::CancelTrip);
        assert!(req.arguments.is_null());
    }

    #[test]
    fn tally_increments_on_same_kind() {
        let mut tally = ErrorTally::default();
        tally.record_failure(CallKind::DriverSearch);
        tally.record_failure(CallKind::DriverSearch);
        assert_eq!(tally.count, 2);
        assert_eq!(tally.kind, Some(CallKind::DriverSearch));
    }

    #[test]
    fn tally_restarts_on_kind_switch() {
        let mut tally = ErrorTally::default();
        tally.record_failure(CallKind::DriverSearch);
        tally.record_failure(CallKind::DriverSearch);
        tally.record_failure(CallKind::TripCreate);
        assert_eq!(tally.count, 1);
        assert_eq!(tally.kind, Some(CallKind::TripCreate));
    }

    #[test]
    fn tally_resets_on_any_success() {
        let mut tally = ErrorTally::default();
        tally.record_failure(CallKind::DriverNotify);
        tally.record_failure(CallKind::DriverNotify);
        tally.record_failure(CallKind::DriverNotify);
        tally.record_success();
        assert_eq!(tally, ErrorTally::default());
    }

    #[test]
    fn turn_log_serialization_round_trips() {
        let turns = vec![
            Turn::User {
                text: "book a cab".into(),
            },
            Turn::ActionResult {
                action: ActionKind::CreateTrip,
                outcome: r#"{"status":"success"}"#.into(),
            },
            Turn::Assistant {
                text: "done".into(),
            },
        ];
        let json = serde_json::to_string(&turns).unwrap();
        let parsed: Vec<Turn> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, turns);
    }

    #[test]
    fn empty_identity_detected() {
        assert!(CustomerIdentity::default().is_empty());
        let ident = CustomerIdentity {
            id: "c-1".into(),
            ..Default::default()
        };
        assert!(!ident.is_empty());
    }
}
