// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trip data model: route, schedule, and the lifecycle record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// One endpoint of a route: a city name, optionally paired with the richer
/// location object supplied by the input channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
}

impl Place {
    pub fn city(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            detail: None,
        }
    }
}

/// Pickup and drop endpoints for a trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub pickup: Place,
    pub drop: Place,
}

impl Route {
    /// True when both routes name the same pickup and drop cities,
    /// compared case-insensitively.
    pub fn same_cities(&self, other: &Route) -> bool {
        self.pickup.city.eq_ignore_ascii_case(&other.pickup.city)
            && self.drop.city.eq_ignore_ascii_case(&other.drop.city)
    }
}

/// Trip direction.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
pub enum TripType {
    #[serde(rename = "one-way")]
    #[strum(serialize = "one-way")]
    OneWay,
    #[serde(rename = "round-trip")]
    #[strum(serialize = "round-trip")]
    RoundTrip,
}

/// Validated trip dates.
///
/// For one-way trips `end_date` equals `start_date`; for round trips it is
/// strictly later. The trip lifecycle controller is the only constructor of
/// committed schedules, so downstream code may rely on this holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub trip_type: TripType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Lifecycle status of a committed trip.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TripStatus {
    Created,
    Modified,
    Cancelled,
}

/// One booking request and its lifecycle status.
///
/// Exists only after the trip backend accepted a creation call, so
/// `trip_id` is always populated. "No trip" is `Option::None` at the
/// conversation-state level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    pub trip_id: String,
    pub route: Route,
    pub schedule: Schedule,
    pub status: TripStatus,
}

impl TripRecord {
    /// True while the trip can still be modified or cancelled.
    pub fn is_active(&self) -> bool {
        matches!(self.status, TripStatus::Created | TripStatus::Modified)
    }
}

/// The compact trip block sent along with driver notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripSummary {
    pub from: String,
    pub to: String,
    pub trip_type: TripType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl TripSummary {
    pub fn of(trip: &TripRecord) -> Self {
        Self {
            from: trip.route.pickup.city.clone(),
            to: trip.route.drop.city.clone(),
            trip_type: trip.schedule.trip_type,
            start_date: trip.schedule.start_date,
            end_date: trip.schedule.end_date,
        }
    }
}
