// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pre-commit trip drafts and their completeness validation.
//!
//! A draft holds whatever fields the planner managed to extract. Validation
//! either yields a fully-populated route and schedule, or a typed rejection
//! naming exactly what is missing or wrong -- recovered by asking the user,
//! never surfaced as a technical error. Partial drafts can never reach the
//! backend.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use sawari_core::{Place, Route, Schedule, TripType};

/// Indian state names that users sometimes supply instead of a city.
/// Rejected before any external call. Goa is intentionally absent: it is a
/// state, but it is also how customers name the destination.
const STATE_NAMES: &[&str] = &[
    "rajasthan",
    "punjab",
    "haryana",
    "gujarat",
    "maharashtra",
    "kerala",
    "karnataka",
    "tamil nadu",
    "uttar pradesh",
    "madhya pradesh",
    "bihar",
    "odisha",
    "west bengal",
    "telangana",
    "andhra pradesh",
    "uttarakhand",
    "himachal pradesh",
    "jharkhand",
    "chhattisgarh",
    "assam",
];

/// A required trip field the draft does not yet carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingField {
    PickupCity,
    DropCity,
    TripType,
    StartDate,
    ReturnDate,
}

impl MissingField {
    /// The user-facing name of the field, used when asking for it.
    pub fn user_name(self) -> &'static str {
        match self {
            MissingField::PickupCity => "pickup city",
            MissingField::DropCity => "drop city",
            MissingField::TripType => "trip type (one-way or round-trip)",
            MissingField::StartDate => "travel date",
            MissingField::ReturnDate => "return date",
        }
    }
}

/// Why a draft cannot be committed. All variants are conversational
/// outcomes, not faults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DraftRejection {
    /// One or more required fields are absent.
    MissingFields(Vec<MissingField>),
    /// A state name was supplied where a city is required.
    StateNameAsCity(String),
    /// A round trip whose return date is not after the start date.
    ReturnNotAfterStart,
}

/// The planner-extracted trip fields, all optional until validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripDraft {
    pub pickup_city: Option<String>,
    pub drop_city: Option<String>,
    pub trip_type: Option<TripType>,
    pub start_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    /// Richer pickup location object from the input channel, if any.
    pub pickup_detail: Option<serde_json::Value>,
    /// Richer drop location object from the input channel, if any.
    pub drop_detail: Option<serde_json::Value>,
}

impl TripDraft {
    /// Validates completeness and produces the committed route and schedule.
    ///
    /// For one-way trips the end date equals the start date; for round
    /// trips the return date is required and must be strictly later.
    pub fn into_commit(self) -> Result<(Route, Schedule), DraftRejection> {
        let mut missing = Vec::new();

        let pickup = match non_empty(&self.pickup_city) {
            Some(city) => Some(city),
            None => {
                missing.push(MissingField::PickupCity);
                None
            }
        };
        let drop = match non_empty(&self.drop_city) {
            Some(city) => Some(city),
            None => {
                missing.push(MissingField::DropCity);
                None
            }
        };
        let trip_type = match self.trip_type {
            Some(t) => Some(t),
            None => {
                missing.push(MissingField::TripType);
                None
            }
        };
        let start_date = match self.start_date {
            Some(d) => Some(d),
            None => {
                missing.push(MissingField::StartDate);
                None
            }
        };
        if trip_type == Some(TripType::RoundTrip) && self.return_date.is_none() {
            missing.push(MissingField::ReturnDate);
        }
        if !missing.is_empty() {
            return Err(DraftRejection::MissingFields(missing));
        }

        let (pickup, drop) = (pickup.unwrap(), drop.unwrap());
        let (trip_type, start_date) = (trip_type.unwrap(), start_date.unwrap());

        for city in [&pickup, &drop] {
            if STATE_NAMES.contains(&city.to_ascii_lowercase().as_str()) {
                return Err(DraftRejection::StateNameAsCity(city.clone()));
            }
        }

        let end_date = match trip_type {
            TripType::OneWay => start_date,
            TripType::RoundTrip => {
                let ret = self.return_date.unwrap();
                if ret <= start_date {
                    return Err(DraftRejection::ReturnNotAfterStart);
                }
                ret
            }
        };

        let route = Route {
            pickup: Place {
                city: pickup,
                detail: self.pickup_detail,
            },
            drop: Place {
                city: drop,
                detail: self.drop_detail,
            },
        };
        let schedule = Schedule {
            trip_type,
            start_date,
            end_date,
        };
        Ok((route, schedule))
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
