// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the driver directory search API.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use sawari_config::model::BackendConfig;
use sawari_core::{
    AdapterType, DriverDirectory, HealthStatus, PluginAdapter, PreferenceRecord, SawariError,
};

use crate::wire::filter_query_params;

/// Response body from the driver search endpoint.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Vec<DriverEntry>,
}

/// One driver row; only the id matters to this service.
#[derive(Debug, Deserialize)]
struct DriverEntry {
    id: Option<String>,
}

/// Driver directory client.
pub struct BackendDriverDirectory {
    client: reqwest::Client,
    base_url: String,
}

impl BackendDriverDirectory {
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
            base_url: config.driver_directory_url.trim_end_matches('/').to_string(),
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
impl PluginAdapter for BackendDriverDirectory {
    fn name(&self) -> &str {
        "backend-driver-directory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::DriverDirectory
    }

    async fn health_check(&self) -> Result<HealthStatus, SawariError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SawariError> {
        Ok(())
    }
}

#[async_trait]
impl DriverDirectory for BackendDriverDirectory {
    async fn search(
        &self,
        city: &str,
        page: u32,
        page_size: u32,
        filters: &PreferenceRecord,
    ) -> Result<Vec<String>, SawariError> {
        let mut params = vec![
            ("city".to_string(), city.to_string()),
            ("page".to_string(), page.to_string()),
            ("limit".to_string(), page_size.to_string()),
        ];
        params.extend(filter_query_params(filters));

        let url = format!("{}/v1/drivers", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| SawariError::Backend {
                message: format!("driver search request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "driver search rejected");
            return Err(SawariError::Backend {
                message: format!("driver search returned {status}: {body}"),
                source: None,
            });
        }

        let body: SearchResponse =
            response.json().await.map_err(|e| SawariError::Backend {
                message: format!("malformed driver search response: {e}"),
                source: Some(Box::new(e)),
            })?;

        if !body.success {
            return Err(SawariError::Backend {
                message: format!(
                    "driver search reported failure: {}",
                    body.message.unwrap_or_default()
                ),
                source: None,
            });
        }

        let ids: Vec<String> = body.data.into_iter().filter_map(|d| d.id).collect();
        debug!(city, page, found = ids.len(), "driver search complete");
        Ok(ids)
    }
}
