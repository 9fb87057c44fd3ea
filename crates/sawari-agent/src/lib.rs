// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Orchestration loop and turn handling for the Sawari booking agent.
//!
//! The [`Agent`] is the central coordinator that:
//! - Loads and persists per-user conversation state (whole-state replace)
//! - Runs the plan/act loop against the reasoning oracle
//! - Dispatches requested actions to the lifecycle controller, filter
//!   normalizer, and driver-batch paginator with deterministic identity
//!   injection
//! - Bounds every message with an iteration ceiling and a deadline

pub mod actions;
pub mod agent;
pub mod replies;

pub use agent::{Agent, AgentSettings};
