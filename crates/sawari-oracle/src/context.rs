// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic rendering of conversation state for the planner.
//!
//! The planner sees the same state block every turn: current date,
//! customer identity, the active trip, accumulated preferences, and the
//! action catalogue. Prompt prose (tone, language, examples) is the
//! planning service's own concern and never appears here.

use chrono::NaiveDate;

use sawari_core::{ConversationState, TripStatus};

/// The fixed action catalogue, rendered for the planner. One line per
/// action: name, then the argument keys it accepts.
const ACTION_CATALOGUE: &str = "\
create_trip: pickup_city, drop_city, trip_type, start_date, return_date, preferences, passenger_count
modify_trip: trip_type, start_date, return_date, preferences, passenger_count
cancel_trip: (no arguments)
search_and_notify_drivers: preferences";

/// Renders the system context block for one planning step.
pub fn render_context(state: &ConversationState, today: NaiveDate) -> String {
    let mut out = String::new();

    out.push_str(&format!("current_date: {today}\n"));
    out.push_str(&format!("source_channel: {}\n", state.source_channel));

    if !state.identity.is_empty() {
        out.push_str(&format!(
            "customer: {} (id {})\n",
            state.identity.name, state.identity.id
        ));
    }
    if let Some(count) = state.passenger_count {
        out.push_str(&format!("passenger_count: {count}\n"));
    }

    match &state.trip {
        Some(trip) if trip.status != TripStatus::Cancelled => {
            out.push_str("active_trip:\n");
            out.push_str(&format!(
                "  route: {} to {}\n",
                trip.route.pickup.city, trip.route.drop.city
            ));
            out.push_str(&format!(
                "  schedule: {} from {} to {}\n",
                trip.schedule.trip_type, trip.schedule.start_date, trip.schedule.end_date
            ));
            out.push_str(&format!("  status: {}\n", trip.status));
            out.push_str(&format!(
                "  drivers_notified: {}\n",
                state.notified_driver_ids.len()
            ));
        }
        _ => out.push_str("active_trip: none\n"),
    }

    if !state.preferences.is_empty() {
        out.push_str(&format!(
            "preferences: {}\n",
            serde_json::to_string(&state.preferences).expect("preferences serialize")
        ));
    }

    out.push_str("actions:\n");
    out.push_str(ACTION_CATALOGUE);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use sawari_core::{
        CustomerIdentity, Place, PreferenceRecord, Route, Schedule, TripRecord, TripType,
        VehicleCategory,
    };

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
    }

    #[test]
    fn fresh_state_renders_no_trip() {
        let state = ConversationState::new(CustomerIdentity::default(), "app");
        let context = render_context(&state, today());
        assert!(context.contains("current_date: 2026-08-07"));
        assert!(context.contains("active_trip: none"));
        assert!(context.contains("create_trip:"));
    }

    #[test]
    fn active_trip_renders_route_and_status() {
        let mut state = ConversationState::new(
            CustomerIdentity {
                id: "c-1".into(),
                name: "Asha".into(),
                phone: "+91".into(),
                profile_image: String::new(),
            },
            "app",
        );
        state.trip = Some(TripRecord {
            trip_id: "t-1".into(),
            route: Route {
                pickup: Place::city("Jaipur"),
                drop: Place::city("Delhi"),
            },
            schedule: Schedule {
                trip_type: TripType::OneWay,
                start_date: today(),
                end_date: today(),
            },
            status: TripStatus::Created,
        });
        state.preferences.vehicle_categories.push(VehicleCategory::Suv);

        let context = render_context(&state, today());
        assert!(context.contains("route: Jaipur to Delhi"));
        assert!(context.contains("status: created"));
        assert!(context.contains("customer: Asha (id c-1)"));
        assert!(context.contains("\"vehicle_categories\":[\"suv\"]"));
    }

    #[test]
    fn cancelled_trip_renders_as_none() {
        let mut state = ConversationState::new(CustomerIdentity::default(), "app");
        state.trip = Some(TripRecord {
            trip_id: "t-1".into(),
            route: Route {
                pickup: Place::city("Jaipur"),
                drop: Place::city("Delhi"),
            },
            schedule: Schedule {
                trip_type: TripType::OneWay,
                start_date: today(),
                end_date: today(),
            },
            status: TripStatus::Cancelled,
        });
        assert!(render_context(&state, today()).contains("active_trip: none"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let state = ConversationState::new(CustomerIdentity::default(), "app");
        let empty_prefs = PreferenceRecord::default();
        assert!(state.preferences == empty_prefs);
        assert_eq!(
            render_context(&state, today()),
            render_context(&state, today())
        );
    }
}
