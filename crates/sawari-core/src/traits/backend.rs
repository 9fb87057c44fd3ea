// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter traits for the remote booking backends: trip creation,
//! driver directory, and driver notification.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SawariError;
use crate::prefs::PreferenceRecord;
use crate::traits::adapter::PluginAdapter;
use crate::trip::{Route, Schedule, TripSummary};
use crate::types::CustomerIdentity;

/// Everything the trip backend needs to open a booking request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripCreateRequest {
    pub customer: CustomerIdentity,
    pub route: Route,
    pub schedule: Schedule,
    pub preferences: PreferenceRecord,
    pub source_channel: String,
}

/// Adapter for the remote trip backend.
#[async_trait]
pub trait TripApi: PluginAdapter {
    /// Creates a trip; returns the backend-assigned trip identifier.
    async fn create(&self, request: &TripCreateRequest) -> Result<String, SawariError>;

    /// Cancels a trip by identifier.
    async fn cancel(&self, trip_id: &str) -> Result<(), SawariError>;
}

/// Adapter for the driver directory search API.
#[async_trait]
pub trait DriverDirectory: PluginAdapter {
    /// Fetches one page of candidate driver ids for a pickup city,
    /// filtered by the given preference record. Pages are 1-based.
    async fn search(
        &self,
        city: &str,
        page: u32,
        page_size: u32,
        filters: &PreferenceRecord,
    ) -> Result<Vec<String>, SawariError>;
}

/// Adapter for the driver notification (availability request) API.
#[async_trait]
pub trait Notifier: PluginAdapter {
    /// Sends an availability request to a batch of drivers for a trip.
    async fn notify(
        &self,
        trip_id: &str,
        driver_ids: &[String],
        summary: &TripSummary,
        customer: &CustomerIdentity,
    ) -> Result<(), SawariError>;
}
