// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Preference normalization for the Sawari booking agent.
//!
//! Maps arbitrary planner-expressed preference input (mixed types,
//! synonyms, specific car models) into the canonical, typed
//! [`sawari_core::PreferenceRecord`]. This crate is the single point where
//! the rest of the system is shielded from however loosely the upstream
//! planner expresses preferences; downstream components never re-validate.

pub mod coerce;
pub mod normalize;
pub mod vehicles;

pub use normalize::{normalize, GroupThresholds};
pub use vehicles::fold_vehicle;
