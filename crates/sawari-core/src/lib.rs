// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Sawari booking agent.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Sawari workspace. All adapter plugins
//! implement traits defined here.

pub mod error;
pub mod prefs;
pub mod state;
pub mod traits;
pub mod trip;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::SawariError;
pub use prefs::{FilterTier, Gender, PreferenceRecord, SortOrder, VehicleCategory};
pub use state::ConversationState;
pub use trip::{Place, Route, Schedule, TripRecord, TripStatus, TripSummary, TripType};
pub use types::{
    ActionKind, ActionRequest, AdapterType, CallKind, CustomerIdentity, ErrorTally,
    HealthStatus, InboundMessage, OracleDecision, ReplyEnvelope, Turn,
};

// Re-export all adapter traits at crate root.
pub use traits::{
    DriverDirectory, Notifier, OracleAdapter, PluginAdapter, SessionStore, TripApi,
    TripCreateRequest,
};
