// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reasoning oracle adapter for the Sawari booking agent.
//!
//! The oracle is an external, non-deterministic planning service: it reads
//! the turn log plus a deterministic state rendering and returns either a
//! plain reply or structured action requests from the fixed catalogue.
//! This crate owns the wire protocol, the HTTP client, and the state
//! rendering; it trusts nothing the oracle says about identity or
//! lifecycle -- that enforcement lives in the orchestration loop.

pub mod client;
pub mod context;
pub mod protocol;

pub use client::HttpOracle;
pub use context::render_context;
pub use protocol::{PlanRequest, PlanResponse};
