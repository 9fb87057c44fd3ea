// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! TTL-backed session persistence for the Sawari booking agent.
//!
//! Provides WAL-mode SQLite storage with embedded migrations and a
//! single-writer concurrency model via `tokio-rusqlite`, an in-process
//! store with identical TTL semantics, and a degrading wrapper that keeps
//! requests alive through a primary-store outage.

pub mod database;
pub mod fallback;
pub mod memory;
pub mod migrations;
pub mod sqlite;

pub use database::Database;
pub use fallback::FallbackSessionStore;
pub use memory::MemorySessionStore;
pub use sqlite::SqliteSessionStore;
