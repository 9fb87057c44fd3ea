// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serialization helpers shared by the backend clients.
//!
//! The backend APIs predate this service and have quirks that live here so
//! the rest of the workspace stays typed: camelCase keys, booleans as the
//! strings "true"/"false" in query parameters, ISO timestamps carrying the
//! current wall-clock time, and short mm/dd/yy dates in notifications.

use chrono::{NaiveDate, Utc};
use serde_json::{json, Map, Value};

use sawari_core::{Place, PreferenceRecord};

/// Formats a trip date as an ISO-8601 UTC timestamp with the current time
/// of day, the shape the trip backend expects.
pub fn iso_datetime(date: NaiveDate) -> String {
    let now = Utc::now();
    let dt = date
        .and_time(now.time())
        .and_utc();
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Formats a date as mm/dd/yy for the notification payload.
pub fn short_date(date: NaiveDate) -> String {
    date.format("%m/%d/%y").to_string()
}

/// Renders a route endpoint as the backend's location object. A richer
/// location object from the input channel is passed through, with the city
/// guaranteed present.
pub fn location_object(place: &Place) -> Value {
    match &place.detail {
        Some(Value::Object(detail)) => {
            let mut obj = detail.clone();
            obj.entry("city".to_string())
                .or_insert_with(|| Value::String(place.city.clone()));
            Value::Object(obj)
        }
        _ => json!({
            "city": place.city,
            "coordinates": "",
            "placeName": "",
        }),
    }
}

/// Renders a preference record as the trip-creation preferences body
/// (typed values, camelCase keys, absent keys omitted).
pub fn preferences_body(prefs: &PreferenceRecord) -> Value {
    let mut body = Map::new();

    if !prefs.vehicle_categories.is_empty() {
        body.insert(
            "vehicleTypesList".into(),
            json!(prefs
                .vehicle_categories
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()),
        );
    }
    if !prefs.languages.is_empty() {
        body.insert("languages".into(), json!(prefs.languages));
    }
    if let Some(gender) = prefs.gender {
        body.insert("gender".into(), json!(gender.to_string()));
    }
    if let Some(age) = prefs.max_age {
        body.insert("age".into(), json!(age));
    }
    if let Some(order) = prefs.licence_seniority_order {
        body.insert("dlDateOfIssue".into(), json!(order.to_string()));
    }
    if let Some(order) = prefs.connections_order {
        body.insert("connections".into(), json!(order.to_string()));
    }
    for (key, value) in [
        ("isPetAllowed", prefs.is_pet_allowed),
        ("married", prefs.married),
        ("allowHandicappedPersons", prefs.allow_handicapped_persons),
        (
            "availableForCustomersPersonalCar",
            prefs.available_for_customers_personal_car,
        ),
        (
            "availableForDrivingInEventWedding",
            prefs.available_for_driving_in_event_wedding,
        ),
        (
            "availableForPartTimeFullTime",
            prefs.available_for_part_time_full_time,
        ),
    ] {
        if let Some(v) = value {
            body.insert(key.into(), json!(v));
        }
    }

    Value::Object(body)
}

/// Renders a preference record as driver-search query parameters.
/// Booleans become the strings "true"/"false"; lists become comma-joined
/// strings.
pub fn filter_query_params(prefs: &PreferenceRecord) -> Vec<(String, String)> {
    let mut params = Vec::new();

    if let Some(v) = prefs.min_age {
        params.push(("minAge".into(), v.to_string()));
    }
    if let Some(v) = prefs.max_age {
        params.push(("maxAge".into(), v.to_string()));
    }
    if let Some(v) = prefs.min_experience {
        params.push(("minExperience".into(), v.to_string()));
    }
    if let Some(v) = prefs.min_driving_experience {
        params.push(("minDrivingExperience".into(), v.to_string()));
    }
    if let Some(v) = prefs.min_connections {
        params.push(("minConnections".into(), v.to_string()));
    }
    if let Some(gender) = prefs.gender {
        params.push(("gender".into(), gender.to_string()));
    }
    if !prefs.languages.is_empty() {
        params.push(("verifiedLanguages".into(), prefs.languages.join(",")));
    }
    if !prefs.vehicle_categories.is_empty() {
        params.push((
            "vehicleTypes".into(),
            prefs
                .vehicle_categories
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(","),
        ));
    }
    for (key, value) in [
        ("isPetAllowed", prefs.is_pet_allowed),
        ("married", prefs.married),
        ("profileVerified", prefs.profile_verified),
        ("verified", prefs.verified),
        ("allowHandicappedPersons", prefs.allow_handicapped_persons),
        (
            "availableForCustomersPersonalCar",
            prefs.available_for_customers_personal_car,
        ),
        (
            "availableForDrivingInEventWedding",
            prefs.available_for_driving_in_event_wedding,
        ),
        (
            "availableForPartTimeFullTime",
            prefs.available_for_part_time_full_time,
        ),
    ] {
        if let Some(v) = value {
            params.push((key.into(), if v { "true".into() } else { "false".into() }));
        }
    }

    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use sawari_core::{Gender, SortOrder, VehicleCategory};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn iso_datetime_carries_the_date() {
        let formatted = iso_datetime(date("2026-08-08"));
        assert!(formatted.starts_with("2026-08-08T"));
        assert!(formatted.ends_with('Z'));
    }

    #[test]
    fn short_date_is_mm_dd_yy() {
        assert_eq!(short_date(date("2026-08-08")), "08/08/26");
    }

    #[test]
    fn plain_city_renders_empty_location_fields() {
        let obj = location_object(&Place::city("Jaipur"));
        assert_eq!(obj["city"], "Jaipur");
        assert_eq!(obj["coordinates"], "");
    }

    #[test]
    fn channel_location_detail_is_passed_through_with_city() {
        let place = Place {
            city: "Jaipur".into(),
            detail: Some(json!({"placeName": "Amer Fort", "coordinates": "26.98,75.85"})),
        };
        let obj = location_object(&place);
        assert_eq!(obj["placeName"], "Amer Fort");
        assert_eq!(obj["city"], "Jaipur");
    }

    #[test]
    fn preferences_body_uses_typed_values() {
        let prefs = PreferenceRecord {
            vehicle_categories: vec![VehicleCategory::Suv],
            languages: vec!["Hindi".into()],
            gender: Some(Gender::Male),
            max_age: Some(45),
            is_pet_allowed: Some(true),
            licence_seniority_order: Some(SortOrder::Asc),
            ..Default::default()
        };
        let body = preferences_body(&prefs);
        assert_eq!(body["vehicleTypesList"], json!(["suv"]));
        assert_eq!(body["isPetAllowed"], json!(true));
        assert_eq!(body["age"], json!(45));
        assert_eq!(body["dlDateOfIssue"], "asc");
        assert!(body.get("married").is_none());
    }

    #[test]
    fn query_params_stringify_booleans() {
        let prefs = PreferenceRecord {
            vehicle_categories: vec![VehicleCategory::Sedan, VehicleCategory::Suv],
            min_experience: Some(5),
            is_pet_allowed: Some(false),
            ..Default::default()
        };
        let params = filter_query_params(&prefs);
        assert!(params.contains(&("vehicleTypes".into(), "sedan,suv".into())));
        assert!(params.contains(&("minExperience".into(), "5".into())));
        assert!(params.contains(&("isPetAllowed".into(), "false".into())));
    }

    #[test]
    fn empty_record_produces_no_params() {
        assert!(filter_query_params(&PreferenceRecord::default()).is_empty());
        assert_eq!(preferences_body(&PreferenceRecord::default()), json!({}));
    }
}
