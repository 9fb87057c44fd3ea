// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canned user-facing replies for outcomes the oracle never sees.
//!
//! These strings carry actionable next steps only: no trip or customer
//! identifiers, no call counts, no description of what failed internally.

/// Reply after a reset command wiped the session.
pub fn reset() -> String {
    "Let's start fresh! Please tell me your pickup city, destination, travel date, \
     and whether it's a one-way or round trip."
        .to_string()
}

/// Fallback when the oracle returns an empty reply.
pub fn fallback() -> String {
    "I'm here to help you book a cab. Please tell me your pickup city, destination, \
     and travel date."
        .to_string()
}

/// Reply when the per-message deadline expired mid-turn.
pub fn still_working() -> String {
    "The booking process is taking longer than expected. Please try again.".to_string()
}

/// Generic apology after a failure that is still worth retrying.
pub fn apology() -> String {
    "I ran into a problem there. Please try again in a moment.".to_string()
}

/// Terminal escalation to human support.
pub fn support(contact: &str) -> String {
    format!(
        "I'm having trouble completing this right now. Please call our support team \
         at {contact} for immediate assistance."
    )
}
