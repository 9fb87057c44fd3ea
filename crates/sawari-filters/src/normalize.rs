// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The filter normalizer: the single point where loosely-expressed planner
//! preferences become the canonical [`PreferenceRecord`].
//!
//! Contract: `normalize(existing, raw, passenger_count)` parses the raw map
//! against a fixed schema table, folds vehicle synonyms, applies
//! passenger-count vehicle defaulting, and merges the result over the
//! existing record (new values override old ones per key; untouched keys
//! carry forward). Unrecognized keys and uncoercible values are dropped
//! silently -- a bad preference never fails the call.

use std::str::FromStr;

use serde_json::{Map, Value};
use tracing::debug;

use sawari_core::{Gender, PreferenceRecord, SortOrder, VehicleCategory};

use crate::coerce::{coerce_bool, coerce_string, coerce_string_list, coerce_u32};
use crate::vehicles::fold_vehicle;

/// Passenger-count thresholds for automatic vehicle selection.
///
/// The observed product variants disagree on the exact numbers, so they are
/// injected rather than hard-coded; see `FiltersConfig`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupThresholds {
    /// At or above this count, a tempo traveller is force-added.
    pub large: u32,
    /// At or above this count (but below `large`), an SUV is force-added.
    pub medium: u32,
}

impl Default for GroupThresholds {
    fn default() -> Self {
        Self { large: 8, medium: 5 }
    }
}

/// Per-key parse results for one raw preference map.
///
/// `None` means the key was absent (or dropped); the merge step only
/// touches fields the patch actually carries.
#[derive(Debug, Default)]
struct PreferencePatch {
    vehicle_categories: Option<Vec<VehicleCategory>>,
    languages: Option<Vec<String>>,
    gender: Option<Gender>,
    min_age: Option<u32>,
    max_age: Option<u32>,
    min_experience: Option<u32>,
    min_driving_experience: Option<u32>,
    min_connections: Option<u32>,
    is_pet_allowed: Option<bool>,
    married: Option<bool>,
    profile_verified: Option<bool>,
    verified: Option<bool>,
    allow_handicapped_persons: Option<bool>,
    available_for_customers_personal_car: Option<bool>,
    available_for_driving_in_event_wedding: Option<bool>,
    available_for_part_time_full_time: Option<bool>,
    connections_order: Option<SortOrder>,
    licence_seniority_order: Option<SortOrder>,
}

/// Builds a fresh preference record by merging `existing` with the
/// preferences expressed in `raw`.
///
/// Vehicle defaulting from `passenger_count` is applied to the patch before
/// the merge, so an explicit vehicle choice in `raw` is extended, never
/// replaced, by the heuristic.
pub fn normalize(
    existing: &PreferenceRecord,
    raw: &Map<String, Value>,
    passenger_count: Option<u32>,
    thresholds: GroupThresholds,
) -> PreferenceRecord {
    let mut patch = parse_raw(raw);
    apply_group_defaults(&mut patch, passenger_count, thresholds);
    merge(existing, patch)
}

/// Parses the raw map against the fixed schema table.
fn parse_raw(raw: &Map<String, Value>) -> PreferencePatch {
    let mut patch = PreferencePatch::default();

    for (key, value) in raw {
        if value.is_null() {
            continue;
        }
        match key.as_str() {
            "minAge" => patch.min_age = coerce_u32(value),
            // `age` is the planner's shorthand for a maximum driver age.
            "maxAge" | "age" => patch.max_age = coerce_u32(value),
            "minExperience" => patch.min_experience = coerce_u32(value),
            "minDrivingExperience" => patch.min_driving_experience = coerce_u32(value),
            "minConnections" => patch.min_connections = coerce_u32(value),

            "isPetAllowed" => patch.is_pet_allowed = coerce_bool(value),
            "married" => patch.married = coerce_bool(value),
            "profileVerified" => patch.profile_verified = coerce_bool(value),
            "verified" => patch.verified = coerce_bool(value),
            "allowHandicappedPersons" => {
                patch.allow_handicapped_persons = coerce_bool(value);
            }
            "availableForCustomersPersonalCar" => {
                patch.available_for_customers_personal_car = coerce_bool(value);
            }
            "availableForDrivingInEventWedding" => {
                patch.available_for_driving_in_event_wedding = coerce_bool(value);
            }
            "availableForPartTimeFullTime" => {
                patch.available_for_part_time_full_time = coerce_bool(value);
            }

            "gender" => {
                patch.gender = coerce_string(value)
                    .and_then(|s| Gender::from_str(&s.to_ascii_lowercase()).ok());
            }
            "verifiedLanguages" | "languages" => {
                patch.languages = coerce_string_list(value);
            }
            "vehicleTypes" | "vehicleTypesList" | "vehicleType" => {
                patch.vehicle_categories = fold_vehicle_list(value);
            }

            "connections" => {
                patch.connections_order = parse_sort_order(value);
            }
            "dlDateOfIssue" => {
                patch.licence_seniority_order = parse_sort_order(value);
            }

            other => {
                debug!(key = other, "dropping unrecognized preference key");
            }
        }
    }

    patch
}

/// Folds a raw vehicle list into categories, deduped with order preserved.
/// Returns `None` when nothing recognizable remains, so the key is treated
/// as absent rather than clearing an earlier choice.
fn fold_vehicle_list(value: &Value) -> Option<Vec<VehicleCategory>> {
    let raw_list = coerce_string_list(value)?;
    let mut categories = Vec::new();
    for entry in &raw_list {
        match fold_vehicle(entry) {
            Some(category) if !categories.contains(&category) => categories.push(category),
            Some(_) => {}
            None => debug!(vehicle = entry.as_str(), "dropping unrecognized vehicle"),
        }
    }
    if categories.is_empty() { None } else { Some(categories) }
}

fn parse_sort_order(value: &Value) -> Option<SortOrder> {
    coerce_string(value).and_then(|s| SortOrder::from_str(&s.to_ascii_lowercase()).ok())
}

/// Force-adds the group-appropriate vehicle category to the patch.
fn apply_group_defaults(
    patch: &mut PreferencePatch,
    passenger_count: Option<u32>,
    thresholds: GroupThresholds,
) {
    let Some(count) = passenger_count else { return };
    let forced = if count >= thresholds.large {
        VehicleCategory::TempoTraveller
    } else if count >= thresholds.medium {
        VehicleCategory::Suv
    } else {
        return;
    };

    let categories = patch.vehicle_categories.get_or_insert_with(Vec::new);
    if !categories.contains(&forced) {
        categories.push(forced);
    }
}

/// Applies the patch over the existing record; untouched keys carry forward.
fn merge(existing: &PreferenceRecord, patch: PreferencePatch) -> PreferenceRecord {
    let mut out = existing.clone();

    if let Some(v) = patch.vehicle_categories {
        out.vehicle_categories = v;
    }
    if let Some(v) = patch.languages {
        out.languages = v;
    }
    if let Some(v) = patch.gender {
        out.gender = Some(v);
    }
    if let Some(v) = patch.min_age {
        out.min_age = Some(v);
    }
    if let Some(v) = patch.max_age {
        out.max_age = Some(v);
    }
    if let Some(v) = patch.min_experience {
        out.min_experience = Some(v);
    }
    if let Some(v) = patch.min_driving_experience {
        out.min_driving_experience = Some(v);
    }
    if let Some(v) = patch.min_connections {
        out.min_connections = Some(v);
    }
    if let Some(v) = patch.is_pet_allowed {
        out.is_pet_allowed = Some(v);
    }
    if let Some(v) = patch.married {
        out.married = Some(v);
    }
    if let Some(v) = patch.profile_verified {
        out.profile_verified = Some(v);
    }
    if let Some(v) = patch.verified {
        out.verified = Some(v);
    }
    if let Some(v) = patch.allow_handicapped_persons {
        out.allow_handicapped_persons = Some(v);
    }
    if let Some(v) = patch.available_for_customers_personal_car {
        out.available_for_customers_personal_car = Some(v);
    }
    if let Some(v) = patch.available_for_driving_in_event_wedding {
        out.available_for_driving_in_event_wedding = Some(v);
    }
    if let Some(v) = patch.available_for_part_time_full_time {
        out.available_for_part_time_full_time = Some(v);
    }
    if let Some(v) = patch.connections_order {
        out.connections_order = Some(v);
    }
    if let Some(v) = patch.licence_seniority_order {
        out.licence_seniority_order = Some(v);
    }

    out
}
