// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parsing of oracle-supplied action arguments.
//!
//! The argument map is loosely typed; this module pulls out what it can and
//! leaves the rest to the draft validation's missing-field reporting.
//! Identity-sensitive fields are deliberately NOT parsed here: customer
//! identity, the active trip id, and location hints are injected from
//! conversation state by the loop, so an oracle-supplied value can never
//! impersonate another customer or act on another trip.

use std::str::FromStr;

use chrono::NaiveDate;
use serde_json::{Map, Value};

use sawari_core::TripType;
use sawari_trip::{TripChanges, TripDraft};

/// Extracts a trimmed non-empty string argument.
fn get_str(args: &Value, key: &str) -> Option<String> {
    args.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Extracts a `YYYY-MM-DD` date argument; malformed dates read as absent,
/// which the draft validation turns into a missing-field prompt.
fn get_date(args: &Value, key: &str) -> Option<NaiveDate> {
    get_str(args, key).and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok())
}

/// Extracts a trip type argument ("one-way" / "round-trip", case-insensitive).
fn get_trip_type(args: &Value, key: &str) -> Option<TripType> {
    get_str(args, key).and_then(|s| TripType::from_str(&s.to_ascii_lowercase()).ok())
}

/// Extracts the raw preference map, if the oracle supplied one.
pub fn preference_map(args: &Value) -> Map<String, Value> {
    args.get("preferences")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default()
}

/// Extracts the passenger count, if supplied.
pub fn passenger_count(args: &Value) -> Option<u32> {
    match args.get("passenger_count") {
        Some(Value::Number(n)) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Builds a trip draft from `create_trip` arguments.
pub fn trip_draft(args: &Value) -> TripDraft {
    TripDraft {
        pickup_city: get_str(args, "pickup_city"),
        drop_city: get_str(args, "drop_city"),
        trip_type: get_trip_type(args, "trip_type"),
        start_date: get_date(args, "start_date"),
        return_date: get_date(args, "return_date"),
        pickup_detail: None,
        drop_detail: None,
    }
}

/// Builds a change set from `modify_trip` arguments; only fields the oracle
/// actually supplied are touched.
pub fn trip_changes(args: &Value) -> TripChanges {
    TripChanges {
        trip_type: get_trip_type(args, "trip_type"),
        start_date: get_date(args, "start_date"),
        return_date: get_date(args, "return_date"),
    }
}
