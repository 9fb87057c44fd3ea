// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the trip backend.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use sawari_config::model::BackendConfig;
use sawari_core::{
    AdapterType, HealthStatus, PluginAdapter, SawariError, TripApi, TripCreateRequest,
};

use crate::wire::{iso_datetime, location_object, preferences_body};

/// Response body from trip creation.
#[derive(Debug, Deserialize)]
struct CreateTripResponse {
    #[serde(rename = "tripId")]
    trip_id: Option<String>,
}

/// Trip backend client.
pub struct BackendTripApi {
    client: reqwest::Client,
    base_url: String,
}

impl BackendTripApi {
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
            base_url: config.trip_api_url.trim_end_matches('/').to_string(),
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
impl PluginAdapter for BackendTripApi {
    fn name(&self) -> &str {
        "backend-trip-api"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::TripBackend
    }

    async fn health_check(&self) -> Result<HealthStatus, SawariError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SawariError> {
        Ok(())
    }
}

#[async_trait]
impl TripApi for BackendTripApi {
    async fn create(&self, request: &TripCreateRequest) -> Result<String, SawariError> {
        let payload = json!({
            "customerId": request.customer.id,
            "customerName": request.customer.name,
            "customerPhone": request.customer.phone,
            "customerProfileImage": request.customer.profile_image,
            "pickUpLocation": location_object(&request.route.pickup),
            "dropLocation": location_object(&request.route.drop),
            "startDate": iso_datetime(request.schedule.start_date),
            "endDate": iso_datetime(request.schedule.end_date),
            "tripType": request.schedule.trip_type.to_string(),
            "preferences": preferences_body(&request.preferences),
            "source": request.source_channel,
        });

        let url = format!("{}/v1/trips", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| SawariError::Backend {
                message: format!("trip creation request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "trip creation rejected");
            return Err(SawariError::Backend {
                message: format!("trip creation returned {status}: {body}"),
                source: None,
            });
        }

        let body: CreateTripResponse =
            response.json().await.map_err(|e| SawariError::Backend {
                message: format!("malformed trip creation response: {e}"),
                source: Some(Box::new(e)),
            })?;

        match body.trip_id {
            Some(trip_id) if !trip_id.is_empty() => {
                debug!(trip_id = trip_id.as_str(), "trip created");
                Ok(trip_id)
            }
            _ => Err(SawariError::Backend {
                message: "trip creation response carried no trip id".into(),
                source: None,
            }),
        }
    }

    async fn cancel(&self, trip_id: &str) -> Result<(), SawariError> {
        let url = format!("{}/v1/trips/{trip_id}/cancel", self.base_url);
        let response =
            self.client
                .post(&url)
                .send()
                .await
                .map_err(|e| SawariError::Backend {
                    message: format!("trip cancellation request failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SawariError::Backend {
                message: format!("trip cancellation returned {status}: {body}"),
                source: None,
            });
        }
        debug!(trip_id, "trip cancelled");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sawari_core::{CustomerIdentity, Place, PreferenceRecord, Route, Schedule, TripType};
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> TripCreateRequest {
        TripCreateRequest {
            customer: CustomerIdentity {
                id: "c-1".into(),
                name: "Asha".into(),
                phone: "+911234567890".into(),
                profile_image: String::new(),
            },
            route: Route {
                pickup: Place::city("Jaipur"),
                drop: Place::city("Delhi"),
            },
            schedule: Schedule {
                trip_type: TripType::OneWay,
                start_date: NaiveDate::from_ymd_opt(2026, 8, 8).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2026, 8, 8).unwrap(),
            },
            preferences: PreferenceRecord::default(),
            source_channel: "app".into(),
        }
    }

    fn api_for(server: &MockServer) -> BackendTripApi {
        BackendTripApi::new(&BackendConfig::default())
            .unwrap()
            .with_base_url(server.uri())
    }

    #[tokio::test]
    async fn create_posts_camel_case_payload_and_returns_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/trips"))
            .and(body_partial_json(serde_json::json!({
                "customerId": "c-1",
                "tripType": "one-way",
                "pickUpLocation": {"city": "Jaipur"},
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "tripId": "trip-42",
                "message": "created"
            })))
            .mount(&server)
            .await;

        let trip_id = api_for(&server).create(&request()).await.unwrap();
        assert_eq!(trip_id, "trip-42");
    }

    #[tokio::test]
    async fn create_without_trip_id_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/trips"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"message": "accepted"})),
            )
            .mount(&server)
            .await;

        assert!(api_for(&server).create(&request()).await.is_err());
    }

    #[tokio::test]
    async fn backend_rejection_surfaces_as_backend_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/trips"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = api_for(&server).create(&request()).await.unwrap_err();
        assert!(matches!(err, SawariError::Backend { .. }));
    }

    #[tokio::test]
    async fn cancel_hits_the_trip_cancel_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/trips/trip-42/cancel"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "success"
            })))
            .expect(1)
            .mount(&server)
            .await;

        api_for(&server).cancel("trip-42").await.unwrap();
    }
}
