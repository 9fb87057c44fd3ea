// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trip lifecycle state machine for the Sawari booking agent.
//!
//! Enforces the create/modify/cancel invariants the reasoning oracle cannot
//! be trusted to enforce on its own: completeness before commit,
//! merge-on-modify with no silent field loss, and explicit-only
//! cancellation with a nothing-to-cancel no-op.

pub mod controller;
pub mod draft;

pub use controller::{
    CancelOutcome, CreateOutcome, ModifyOutcome, TripChanges, TripLifecycle,
};
pub use draft::{DraftRejection, MissingField, TripDraft};
