// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The canonical, typed representation of user-expressed driver filters.
//!
//! Built exclusively by the filter normalizer; every other component treats
//! a [`PreferenceRecord`] as already validated and never re-checks it.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Closed set of vehicle categories. Specific car models are folded into
/// these by the normalizer's synonym table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum VehicleCategory {
    Hatchback,
    Sedan,
    Suv,
    TempoTraveller,
}

/// Driver gender preference.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// Ordering direction for ranked preference keys.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// How much of the preference record to offer an external call.
///
/// The escalation ladder walks down this enum after consecutive failures;
/// each tier is a strict subset of the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterTier {
    /// The full normalized record.
    Full,
    /// Vehicle categories only.
    VehicleOnly,
    /// No filters at all; bare route and schedule.
    Bare,
}

/// Canonical driver/vehicle filter record with a fixed key set.
///
/// All fields are optional; an empty record means "no preference". Vehicle
/// categories preserve the user's expressed order with duplicates removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferenceRecord {
    pub vehicle_categories: Vec<VehicleCategory>,
    pub languages: Vec<String>,
    pub gender: Option<Gender>,
    pub min_age: Option<u32>,
    pub max_age: Option<u32>,
    pub min_experience: Option<u32>,
    pub min_driving_experience: Option<u32>,
    pub min_connections: Option<u32>,
    pub is_pet_allowed: Option<bool>,
    pub married: Option<bool>,
    pub profile_verified: Option<bool>,
    pub verified: Option<bool>,
    pub allow_handicapped_persons: Option<bool>,
    pub available_for_customers_personal_car: Option<bool>,
    pub available_for_driving_in_event_wedding: Option<bool>,
    pub available_for_part_time_full_time: Option<bool>,
    pub connections_order: Option<SortOrder>,
    pub licence_seniority_order: Option<SortOrder>,
}

impl PreferenceRecord {
    /// True when no preference at all has been expressed.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Adds a vehicle category unless it is already present, preserving order.
    pub fn add_vehicle_category(&mut self, category: VehicleCategory) {
        if !self.vehicle_categories.contains(&category) {
            self.vehicle_categories.push(category);
        }
    }

    /// Returns the subset of this record offered at the given tier.
    pub fn reduced(&self, tier: FilterTier) -> PreferenceRecord {
        match tier {
            FilterTier::Full => self.clone(),
            FilterTier::VehicleOnly => PreferenceRecord {
                vehicle_categories: self.vehicle_categories.clone(),
                ..Default::default()
            },
            FilterTier::Bare => PreferenceRecord::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_record() -> PreferenceRecord {
        PreferenceRecord {
            vehicle_categories: vec![VehicleCategory::Suv, VehicleCategory::Sedan],
            languages: vec!["Hindi".into(), "English".into()],
            gender: Some(Gender::Male),
            min_experience: Some(5),
            is_pet_allowed: Some(true),
            licence_seniority_order: Some(SortOrder::Asc),
            ..Default::default()
        }
    }

    #[test]
    fn vehicle_category_wire_names() {
        assert_eq!(
            serde_json::to_string(&VehicleCategory::TempoTraveller).unwrap(),
            "\"tempotraveller\""
        );
        assert_eq!(VehicleCategory::Suv.to_string(), "suv");
    }

    #[test]
    fn default_record_is_empty() {
        assert!(PreferenceRecord::default().is_empty());
        assert!(!full_record().is_empty());
    }

    #[test]
    fn add_vehicle_category_dedups_preserving_order() {
        let mut prefs = PreferenceRecord::default();
        prefs.add_vehicle_category(VehicleCategory::Sedan);
        prefs.add_vehicle_category(VehicleCategory::Suv);
        prefs.add_vehicle_category(VehicleCategory::Sedan);
        assert_eq!(
            prefs.vehicle_categories,
            vec![VehicleCategory::Sedan, VehicleCategory::Suv]
        );
    }

    #[test]
    fn reduction_tiers_are_nested_subsets() {
        let full = full_record();
        let vehicle_only = full.reduced(FilterTier::VehicleOnly);
        let bare = full.reduced(FilterTier::Bare);

        assert_eq!(full.reduced(FilterTier::Full), full);
        assert_eq!(vehicle_only.vehicle_categories, full.vehicle_categories);
        assert!(vehicle_only.languages.is_empty());
        assert_eq!(vehicle_only.gender, None);
        assert!(bare.is_empty());
    }

    #[test]
    fn record_serialization_round_trips() {
        let prefs = full_record();
        let json = serde_json::to_string(&prefs).unwrap();
        let parsed: PreferenceRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, prefs);
    }
}
