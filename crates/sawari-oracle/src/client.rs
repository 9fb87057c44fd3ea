// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the planning service.
//!
//! Provides [`HttpOracle`] which handles request construction,
//! authentication, decision decoding, and transient error retry.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, warn};

use sawari_config::model::OracleConfig;
use sawari_core::{
    AdapterType, HealthStatus, OracleAdapter, OracleDecision, PluginAdapter, SawariError,
    Turn,
};

use crate::protocol::{ApiErrorResponse, PlanRequest, PlanResponse};

/// Path of the planning endpoint, relative to the configured base URL.
const PLAN_PATH: &str = "/v1/plan";

/// HTTP client for planning service communication.
///
/// Manages authentication headers, connection pooling, and retry logic
/// for transient errors (429, 500, 503).
#[derive(Debug, Clone)]
pub struct HttpOracle {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
}

impl HttpOracle {
    /// Creates a new planning service client from config.
    pub fn new(config: &OracleConfig) -> Result<Self, SawariError> {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        if let Some(api_key) = &config.api_key {
            let value = HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
                SawariError::Config(format!("invalid API key header value: {e}"))
            })?;
            headers.insert("authorization", value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SawariError::Oracle {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_retries: 1,
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    async fn post_plan(
        &self,
        request: &PlanRequest<'_>,
    ) -> Result<OracleDecision, SawariError> {
        let url = format!("{}{PLAN_PATH}", self.base_url);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying planning request after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self
                .client
                .post(&url)
                .json(request)
                .send()
                .await
                .map_err(|e| SawariError::Oracle {
                    message: format!("HTTP request failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(status = %status, attempt, "planning response received");

            if status.is_success() {
                let plan: PlanResponse =
                    response.json().await.map_err(|e| SawariError::Oracle {
                        message: format!("malformed planning response: {e}"),
                        source: Some(Box::new(e)),
                    })?;
                return plan.into_decision();
            }

            if is_transient_error(status) && attempt < self.max_retries {
                let body = response.text().await.unwrap_or_default();
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(SawariError::Oracle {
                    message: format!("planning service returned {status}: {body}"),
                    source: None,
                });
                continue;
            }

            // Non-transient error or exhausted retries.
            let body = response.text().await.unwrap_or_default();
            let message = if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(&body) {
                format!(
                    "planning service error ({}): {}",
                    api_err.error.type_, api_err.error.message
                )
            } else {
                format!("planning service returned {status}: {body}")
            };
            return Err(SawariError::Oracle {
                message,
                source: None,
            });
        }

        Err(last_error.unwrap_or_else(|| SawariError::Oracle {
            message: "planning request failed after retries".into(),
            source: None,
        }))
    }
}

/// Whether an HTTP status is worth a single retry.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}

#[async_trait]
impl PluginAdapter for HttpOracle {
    fn name(&self) -> &str {
        "http-oracle"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Oracle
    }

    async fn health_check(&self) -> Result<HealthStatus, SawariError> {
        // The planning service exposes no health endpoint; being able to
        // build requests is all we can assert without spending a call.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SawariError> {
        Ok(())
    }
}

#[async_trait]
impl OracleAdapter for HttpOracle {
    async fn invoke(
        &self,
        system_context: &str,
        turns: &[Turn],
    ) -> Result<OracleDecision, SawariError> {
        let request = PlanRequest {
            system_context,
            turns,
        };
        self.post_plan(&request).await
    }
}
