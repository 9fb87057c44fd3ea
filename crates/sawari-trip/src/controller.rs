// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The trip lifecycle state machine.
//!
//! States: none -> created -> modified -> created (new identifier) ...,
//! with cancelled reachable from created/modified only on an explicit
//! cancellation. This controller is the sole writer of trip records; the
//! orchestration loop consumes outcomes and never patches a record itself.
//!
//! Backend failures surface as outcome values so the caller can drive the
//! retry/escalation tally; `Err` is reserved for faults that are not an
//! external-call failure.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use sawari_core::{
    CustomerIdentity, PreferenceRecord, SawariError, TripApi, TripCreateRequest, TripRecord,
    TripStatus, TripType,
};

use crate::draft::{DraftRejection, TripDraft};

/// The subset of schedule fields a modification may touch.
///
/// Only fields the user actually changed are set; everything else is
/// carried forward from the existing record during the merge. No field is
/// ever silently lost when only a subset changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripChanges {
    pub trip_type: Option<TripType>,
    pub start_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
}

impl TripChanges {
    /// True when the modification carries nothing to apply.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Outcome of a create attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    Created(TripRecord),
    /// The draft was incomplete or invalid; state is unchanged and no
    /// external call was made.
    Rejected(DraftRejection),
    /// The backend refused or failed; state is unchanged.
    Failed,
}

/// Outcome of a modify attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ModifyOutcome {
    Modified(TripRecord),
    Rejected(DraftRejection),
    /// There is no active trip to modify.
    NoActiveTrip,
    Failed,
}

/// Outcome of a cancel attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum CancelOutcome {
    Cancelled { trip_id: String },
    /// No active trip exists; reported without calling the backend.
    NothingToCancel,
    Failed,
}

/// Enforces create/modify/cancel invariants against the trip backend.
pub struct TripLifecycle {
    trip_api: Arc<dyn TripApi + Send + Sync>,
}

impl TripLifecycle {
    pub fn new(trip_api: Arc<dyn TripApi + Send + Sync>) -> Self {
        Self { trip_api }
    }

    /// Commits a draft as a new trip.
    ///
    /// Requires route and schedule fully populated; a partial draft never
    /// reaches the backend. On backend failure nothing is persisted -- the
    /// caller's state keeps whatever trip it had before.
    pub async fn create(
        &self,
        draft: TripDraft,
        customer: &CustomerIdentity,
        preferences: &PreferenceRecord,
        source_channel: &str,
    ) -> CreateOutcome {
        let (route, schedule) = match draft.into_commit() {
            Ok(parts) => parts,
            Err(rejection) => return CreateOutcome::Rejected(rejection),
        };

        let request = TripCreateRequest {
            customer: customer.clone(),
            route: route.clone(),
            schedule: schedule.clone(),
            preferences: preferences.clone(),
            source_channel: source_channel.to_string(),
        };

        match self.trip_api.create(&request).await {
            Ok(trip_id) => {
                info!(trip_id = trip_id.as_str(), "trip created");
                CreateOutcome::Created(TripRecord {
                    trip_id,
                    route,
                    schedule,
                    status: TripStatus::Created,
                })
            }
            Err(e) => {
                warn!(error = %e, "trip creation failed");
                CreateOutcome::Failed
            }
        }
    }

    /// Modifies the active trip by cancel-then-recreate.
    ///
    /// The new trip merges the existing record with only the fields the
    /// user changed. Cancelling the prior identifier is best-effort: a
    /// cancellation failure is logged but does not block recreation.
    pub async fn modify(
        &self,
        existing: Option<&TripRecord>,
        changes: TripChanges,
        customer: &CustomerIdentity,
        preferences: &PreferenceRecord,
        source_channel: &str,
    ) -> ModifyOutcome {
        let Some(existing) = existing.filter(|t| t.is_active()) else {
            return ModifyOutcome::NoActiveTrip;
        };

        let merged = merge_changes(existing, &changes);
        let (route, schedule) = match merged.into_commit() {
            Ok(parts) => parts,
            Err(rejection) => return ModifyOutcome::Rejected(rejection),
        };

        if let Err(e) = self.trip_api.cancel(&existing.trip_id).await {
            warn!(
                trip_id = existing.trip_id.as_str(),
                error = %e,
                "best-effort cancel of prior trip failed; continuing with recreation"
            );
        }

        let request = TripCreateRequest {
            customer: customer.clone(),
            route: route.clone(),
            schedule: schedule.clone(),
            preferences: preferences.clone(),
            source_channel: source_channel.to_string(),
        };

        match self.trip_api.create(&request).await {
            Ok(trip_id) => {
                info!(
                    old_trip_id = existing.trip_id.as_str(),
                    new_trip_id = trip_id.as_str(),
                    "trip modified"
                );
                ModifyOutcome::Modified(TripRecord {
                    trip_id,
                    route,
                    schedule,
                    status: TripStatus::Modified,
                })
            }
            Err(e) => {
                warn!(error = %e, "trip recreation failed during modify");
                ModifyOutcome::Failed
            }
        }
    }

    /// Cancels the active trip on an explicit, unambiguous request.
    pub async fn cancel(&self, existing: Option<&TripRecord>) -> CancelOutcome {
        let Some(existing) = existing.filter(|t| t.is_active()) else {
            return CancelOutcome::NothingToCancel;
        };

        match self.trip_api.cancel(&existing.trip_id).await {
            Ok(()) => {
                info!(trip_id = existing.trip_id.as_str(), "trip cancelled");
                CancelOutcome::Cancelled {
                    trip_id: existing.trip_id.clone(),
                }
            }
            Err(e) => {
                warn!(trip_id = existing.trip_id.as_str(), error = %e, "trip cancellation failed");
                CancelOutcome::Failed
            }
        }
    }
}

/// Merges a change set over an existing record, producing the draft for
/// recreation. Unspecified fields carry forward unchanged.
fn merge_changes(existing: &TripRecord, changes: &TripChanges) -> TripDraft {
    let trip_type = changes.trip_type.unwrap_or(existing.schedule.trip_type);
    let start_date = changes.start_date.unwrap_or(existing.schedule.start_date);
    // The prior end date only carries forward for trips staying round-trip;
    // a one-way trip derives its end date from the start during validation.
    let return_date = match trip_type {
        TripType::OneWay => None,
        TripType::RoundTrip => changes.return_date.or_else(|| {
            (existing.schedule.trip_type == TripType::RoundTrip)
                .then_some(existing.schedule.end_date)
        }),
    };

    TripDraft {
        pickup_city: Some(existing.route.pickup.city.clone()),
        drop_city: Some(existing.route.drop.city.clone()),
        trip_type: Some(trip_type),
        start_date: Some(start_date),
        return_date,
        pickup_detail: existing.route.pickup.detail.clone(),
        drop_detail: existing.route.drop.detail.clone(),
    }
}
