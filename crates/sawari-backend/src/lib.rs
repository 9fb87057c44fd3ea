// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Booking backend API clients for the Sawari booking agent.
//!
//! Implements the [`sawari_core::TripApi`], [`sawari_core::DriverDirectory`]
//! and [`sawari_core::Notifier`] traits over the remote HTTP services.
//! Requests carry the backend's legacy wire quirks (camelCase keys,
//! stringified booleans in query parameters); everything above this crate
//! stays typed.

pub mod directory;
pub mod notifier;
pub mod trip;
pub mod wire;

pub use directory::BackendDriverDirectory;
pub use notifier::BackendNotifier;
pub use trip::BackendTripApi;
