// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Sawari integration tests.
//!
//! Mock adapters for every external collaborator (oracle, trip backend,
//! driver directory, notifier) plus a [`TestHarness`] that assembles the
//! full agent stack over a temp SQLite store.

pub mod harness;
pub mod mock_backend;
pub mod mock_oracle;

pub use harness::{envelope, TestHarness, TestHarnessBuilder};
pub use mock_backend::{MockDriverDirectory, MockNotifier, MockTripApi};
pub use mock_oracle::MockOracle;
