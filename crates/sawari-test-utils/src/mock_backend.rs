// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock backend adapters (trip API, driver directory, notifier) with
//! programmable failures and full call recording.

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use sawari_core::{
    AdapterType, CustomerIdentity, DriverDirectory, HealthStatus, Notifier, PluginAdapter,
    PreferenceRecord, SawariError, TripApi, TripCreateRequest, TripSummary,
};

fn backend_down(what: &str) -> SawariError {
    SawariError::Backend {
        message: format!("{what} unavailable (scripted failure)"),
        source: None,
    }
}

/// Decrements a scripted-failure counter, reporting whether this call
/// should fail.
fn take_scripted_failure(counter: &AtomicUsize) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

// --- Trip API ---

/// Trip API mock: assigns sequential trip ids, records every request.
pub struct MockTripApi {
    counter: AtomicU32,
    fail_next_creates: AtomicUsize,
    fail_next_cancels: AtomicUsize,
    pub created: Mutex<Vec<TripCreateRequest>>,
    pub cancelled: Mutex<Vec<String>>,
}

impl MockTripApi {
    pub fn new() -> Self {
        Self {
            counter: AtomicU32::new(0),
            fail_next_creates: AtomicUsize::new(0),
            fail_next_cancels: AtomicUsize::new(0),
            created: Mutex::new(Vec::new()),
            cancelled: Mutex::new(Vec::new()),
        }
    }

    /// Make the next `n` create calls fail.
    pub fn fail_next_creates(&self, n: usize) {
        self.fail_next_creates.store(n, Ordering::SeqCst);
    }

    /// Make the next `n` cancel calls fail.
    pub fn fail_next_cancels(&self, n: usize) {
        self.fail_next_cancels.store(n, Ordering::SeqCst);
    }
}

impl Default for MockTripApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockTripApi {
    fn name(&self) -> &str {
        "mock-trip-api"
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
impl TripApi for MockTripApi {
    async fn create(&self, request: &TripCreateRequest) -> Result<String, SawariError> {
        if take_scripted_failure(&self.fail_next_creates) {
            return Err(backend_down("trip creation"));
        }
        self.created.lock().unwrap().push(request.clone());
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("trip-{n}"))
    }

    async fn cancel(&self, trip_id: &str) -> Result<(), SawariError> {
        if take_scripted_failure(&self.fail_next_cancels) {
            return Err(backend_down("trip cancellation"));
        }
        self.cancelled.lock().unwrap().push(trip_id.to_string());
        Ok(())
    }
}

// --- Driver directory ---

/// Driver directory mock serving `total` sequential driver ids, recording
/// the filters offered on every search call.
pub struct MockDriverDirectory {
    total: usize,
    fail_next: AtomicUsize,
    pub searches: Mutex<Vec<PreferenceRecord>>,
}

impl MockDriverDirectory {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            fail_next: AtomicUsize::new(0),
            searches: Mutex::new(Vec::new()),
        }
    }

    /// Make the next `n` search calls fail.
    pub fn fail_next(&self, n: usize) {
        self.fail_next.store(n, Ordering::SeqCst);
    }
}

#[async_trait]
impl PluginAdapter for MockDriverDirectory {
    fn name(&self) -> &str {
        "mock-driver-directory"
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
impl DriverDirectory for MockDriverDirectory {
    async fn search(
        &self,
        _city: &str,
        page: u32,
        page_size: u32,
        filters: &PreferenceRecord,
    ) -> Result<Vec<String>, SawariError> {
        // Offered filters are recorded even for failing calls, so tests can
        // assert which tier each attempt ran with.
        self.searches.lock().unwrap().push(filters.clone());
        if take_scripted_failure(&self.fail_next) {
            return Err(backend_down("driver search"));
        }
        let start = ((page - 1) * page_size) as usize;
        let end = (start + page_size as usize).min(self.total);
        Ok((start..end).map(|i| format!("d-{i}")).collect())
    }
}

// --- Notifier ---

/// Notifier mock recording each notified batch.
pub struct MockNotifier {
    fail_next: AtomicUsize,
    pub batches: Mutex<Vec<Vec<String>>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self {
            fail_next: AtomicUsize::new(0),
            batches: Mutex::new(Vec::new()),
        }
    }

    /// Make the next `n` notify calls fail.
    pub fn fail_next(&self, n: usize) {
        self.fail_next.store(n, Ordering::SeqCst);
    }

    /// All driver ids notified so far, flattened in order.
    pub fn notified_ids(&self) -> Vec<String> {
        self.batches.lock().unwrap().iter().flatten().cloned().collect()
    }
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockNotifier {
    fn name(&self) -> &str {
        "mock-notifier"
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
impl Notifier for MockNotifier {
    async fn notify(
        &self,
        _trip_id: &str,
        driver_ids: &[String],
        _summary: &TripSummary,
        _customer: &CustomerIdentity,
    ) -> Result<(), SawariError> {
        if take_scripted_failure(&self.fail_next) {
            return Err(backend_down("driver notification"));
        }
        self.batches.lock().unwrap().push(driver_ids.to_vec());
        Ok(())
    }
}
