// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the driver availability notification API.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use sawari_config::model::BackendConfig;
use sawari_core::{
    AdapterType, CustomerIdentity, HealthStatus, Notifier, PluginAdapter, SawariError,
    TripSummary,
};

use crate::wire::short_date;

/// Response body from the availability endpoint.
#[derive(Debug, Deserialize)]
struct NotifyResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

/// Availability notification client.
pub struct BackendNotifier {
    client: reqwest::Client,
    base_url: String,
}

impl BackendNotifier {
    pub fn new(config: &BackendConfig) -> Result<Self, SawariError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SawariError::Backend {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            client,
            base_url: config.notifier_url.trim_end_matches('/').to_string(),
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl PluginAdapter for BackendNotifier {
    fn name(&self) -> &str {
        "backend-notifier"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Notification
    }

    async fn health_check(&self) -> Result<HealthStatus, SawariError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SawariError> {
        Ok(())
    }
}

#[async_trait]
impl Notifier for BackendNotifier {
    async fn notify(
        &self,
        trip_id: &str,
        driver_ids: &[String],
        summary: &TripSummary,
        customer: &CustomerIdentity,
    ) -> Result<(), SawariError> {
        let payload = json!({
            "driverIds": driver_ids,
            "tripId": trip_id,
            "data": {
                "trip_details": {
                    "from": summary.from,
                    "to": summary.to,
                    "trip_time": Utc::now().format("%I:%M %p").to_string(),
                    "trip_start_date": short_date(summary.start_date),
                    "trip_end_date": short_date(summary.end_date),
                    "trip_type": summary.trip_type.to_string(),
                },
                "customerDetails": {
                    "name": customer.name,
                    "id": customer.id,
                    "phoneNo": customer.phone,
                    "profile_image": customer.profile_image,
                },
                "message": "Please confirm your availability for this trip.",
            },
        });

        let url = format!("{}/v1/availability", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| SawariError::Backend {
                message: format!("availability request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "availability request rejected");
            return Err(SawariError::Backend {
                message: format!("availability request returned {status}: {body}"),
                source: None,
            });
        }

        let body: NotifyResponse =
            response.json().await.map_err(|e| SawariError::Backend {
                message: format!("malformed availability response: {e}"),
                source: Some(Box::new(e)),
            })?;

        if !body.success {
            return Err(SawariError::Backend {
                message: format!(
                    "availability request reported failure: {}",
                    body.message.unwrap_or_default()
                ),
                source: None,
            });
        }

        debug!(trip_id, notified = driver_ids.len(), "availability request sent");
        Ok(())
    }
}
