// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Driver batch pagination and notification bookkeeping.
//!
//! Each call fetches one fixed-size page of candidate drivers for the
//! trip's pickup city, drops identifiers that were already notified, sends
//! the availability request for the fresh ones, and advances the cursor.
//! A hard per-trip ceiling and a short page both report exhaustion. Any
//! change to route, schedule, or preferences invalidates the cursor and
//! restarts pagination from page one; the fingerprint that detects this is
//! persisted alongside the cursor in conversation state.

use std::sync::Arc;

use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use sawari_core::{
    ConversationState, CustomerIdentity, DriverDirectory, Notifier, PreferenceRecord,
    TripRecord, TripSummary,
};

/// Pagination limits, injected from config.
#[derive(Debug, Clone, Copy)]
pub struct PaginatorConfig {
    /// Drivers requested per directory page.
    pub page_size: u32,
    /// Hard ceiling on total drivers notified per trip.
    pub max_drivers_per_trip: u32,
}

impl Default for PaginatorConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            max_drivers_per_trip: 50,
        }
    }
}

/// Outcome of one batch attempt. Failures are values so the caller can
/// feed the escalation tally with the right call kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Fresh drivers were notified.
    Notified {
        new_driver_ids: Vec<String>,
        exhausted: bool,
    },
    /// Nothing new to notify: ceiling reached or directory depleted.
    Exhausted,
    /// The directory search call failed.
    SearchFailed,
    /// The availability notification call failed; no bookkeeping was
    /// updated, so the same drivers will be retried next attempt.
    NotifyFailed,
}

/// Fetches, dedups, and notifies driver batches for a trip.
pub struct DriverBatchPaginator {
    directory: Arc<dyn DriverDirectory + Send + Sync>,
    notifier: Arc<dyn Notifier + Send + Sync>,
    config: PaginatorConfig,
}

impl DriverBatchPaginator {
    pub fn new(
        directory: Arc<dyn DriverDirectory + Send + Sync>,
        notifier: Arc<dyn Notifier + Send + Sync>,
        config: PaginatorConfig,
    ) -> Self {
        Self {
            directory,
            notifier,
            config,
        }
    }

    /// Requests the next batch of drivers for the trip and notifies the
    /// previously-unseen ones.
    ///
    /// `filters` is the tier-reduced preference record chosen by the
    /// caller's escalation step; the signature is computed over it, so a
    /// tier change (like any preference change) restarts pagination.
    pub async fn next_batch(
        &self,
        trip: &TripRecord,
        filters: &PreferenceRecord,
        customer: &CustomerIdentity,
        state: &mut ConversationState,
    ) -> BatchOutcome {
        let signature = batch_signature(trip, filters);
        if state.batch_signature.as_deref() != Some(signature.as_str()) {
            debug!("batch signature changed; restarting pagination from page one");
            state.reset_pagination();
            state.batch_signature = Some(signature);
        }

        let ceiling = self.config.max_drivers_per_trip as usize;
        if state.notified_driver_ids.len() >= ceiling {
            return BatchOutcome::Exhausted;
        }

        let page = state.pagination_cursor;
        let page_ids = match self
            .directory
            .search(
                &trip.route.pickup.city,
                page,
                self.config.page_size,
                filters,
            )
            .await
        {
            Ok(ids) => ids,
            Err(e) => {
                warn!(page, error = %e, "driver directory search failed");
                return BatchOutcome::SearchFailed;
            }
        };

        let short_page = (page_ids.len() as u32) < self.config.page_size;
        let room = ceiling - state.notified_driver_ids.len();
        let fresh: Vec<String> = page_ids
            .into_iter()
            .filter(|id| !state.notified_driver_ids.contains(id))
            .take(room)
            .collect();

        if fresh.is_empty() {
            debug!(page, short_page, "page yielded no unseen drivers");
            return if short_page {
                BatchOutcome::Exhausted
            } else {
                // A full page of already-seen ids; the cursor stays put per
                // the advance-only-on-fresh rule.
                BatchOutcome::Notified {
                    new_driver_ids: Vec::new(),
                    exhausted: false,
                }
            };
        }

        let summary = TripSummary::of(trip);
        if let Err(e) = self
            .notifier
            .notify(&trip.trip_id, &fresh, &summary, customer)
            .await
        {
            warn!(trip_id = trip.trip_id.as_str(), error = %e, "driver notification failed");
            return BatchOutcome::NotifyFailed;
        }

        state.notified_driver_ids.extend(fresh.iter().cloned());
        state.pagination_cursor = page + 1;
        let exhausted = short_page || state.notified_driver_ids.len() >= ceiling;

        info!(
            trip_id = trip.trip_id.as_str(),
            page,
            notified = fresh.len(),
            total = state.notified_driver_ids.len(),
            exhausted,
            "driver batch notified"
        );

        BatchOutcome::Notified {
            new_driver_ids: fresh,
            exhausted,
        }
    }
}

/// Stable fingerprint of (route, schedule, preferences) for cursor
/// validation.
pub fn batch_signature(trip: &TripRecord, filters: &PreferenceRecord) -> String {
    let mut hasher = Sha256::new();
    // Serialization of these types is stable field order, so the digest is
    // deterministic for equal inputs.
    hasher.update(serde_json::to_vec(&trip.route).expect("route serializes"));
    hasher.update(serde_json::to_vec(&trip.schedule).expect("schedule serializes"));
    hasher.update(serde_json::to_vec(filters).expect("preferences serialize"));
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use sawari_core::{
        AdapterType, HealthStatus, Place, PluginAdapter, Route, SawariError, Schedule,
        TripStatus, TripType,
    };
    use std::sync::Mutex;

    /// Serves deterministic driver ids: page N yields ids
    /// `d-<N>-0 .. d-<N>-(page_size-1)`, truncated after `total` drivers
    /// exist in the directory overall.
    struct FakeDirectory {
        total: usize,
        fail: Mutex<bool>,
    }

    #[async_trait]
    impl PluginAdapter for FakeDirectory {
        fn name(&self) -> &str {
            "fake-directory"
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
    impl DriverDirectory for FakeDirectory {
        async fn search(
            &self,
            _city: &str,
            page: u32,
            page_size: u32,
            _filters: &PreferenceRecord,
        ) -> Result<Vec<String>, SawariError> {
            if *self.fail.lock().unwrap() {
                return Err(SawariError::Backend {
                    message: "directory down".into(),
                    source: None,
                });
            }
            let start = ((page - 1) * page_size) as usize;
            let end = (start + page_size as usize).min(self.total);
            Ok((start..end).map(|i| format!("d-{i}")).collect())
        }
    }

    struct RecordingNotifier {
        batches: Mutex<Vec<Vec<String>>>,
        fail: Mutex<bool>,
    }

    #[async_trait]
    impl PluginAdapter for RecordingNotifier {
        fn name(&self) -> &str {
            "recording-notifier"
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
    impl Notifier for RecordingNotifier {
        async fn notify(
            &self,
            _trip_id: &str,
            driver_ids: &[String],
            _summary: &TripSummary,
            _customer: &CustomerIdentity,
        ) -> Result<(), SawariError> {
            if *self.fail.lock().unwrap() {
                return Err(SawariError::Backend {
                    message: "notify down".into(),
                    source: None,
                });
            }
            self.batches.lock().unwrap().push(driver_ids.to_vec());
            Ok(())
        }
    }

    fn trip() -> TripRecord {
        TripRecord {
            trip_id: "trip-1".into(),
            route: Route {
                pickup: Place::city("Jaipur"),
                drop: Place::city("Delhi"),
            },
            schedule: Schedule {
                trip_type: TripType::OneWay,
                start_date: NaiveDate::from_ymd_opt(2026, 8, 8).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2026, 8, 8).unwrap(),
            },
            status: TripStatus::Created,
        }
    }

    fn setup(
        total: usize,
        config: PaginatorConfig,
    ) -> (
        DriverBatchPaginator,
        Arc<FakeDirectory>,
        Arc<RecordingNotifier>,
    ) {
        let directory = Arc::new(FakeDirectory {
            total,
            fail: Mutex::new(false),
        });
        let notifier = Arc::new(RecordingNotifier {
            batches: Mutex::new(Vec::new()),
            fail: Mutex::new(false),
        });
        let paginator = DriverBatchPaginator::new(directory.clone(), notifier.clone(), config);
        (paginator, directory, notifier)
    }

    fn state() -> ConversationState {
        ConversationState::new(CustomerIdentity::default(), "app")
    }

    #[tokio::test]
    async fn first_batch_notifies_a_full_page() {
        let (paginator, _, notifier) = setup(30, PaginatorConfig::default());
        let mut state = state();
        let customer = state.identity.clone();

        let outcome = paginator
            .next_batch(&trip(), &PreferenceRecord::default(), &customer, &mut state)
            .await;

        let BatchOutcome::Notified {
            new_driver_ids,
            exhausted,
        } = outcome
        else {
            panic!("expected notified");
        };
        assert_eq!(new_driver_ids.len(), 10);
        assert!(!exhausted);
        assert_eq!(state.pagination_cursor, 2);
        assert_eq!(state.notified_driver_ids.len(), 10);
        assert_eq!(notifier.batches.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn no_driver_is_ever_notified_twice() {
        let (paginator, _, notifier) = setup(25, PaginatorConfig::default());
        let mut state = state();
        let customer = state.identity.clone();

        for _ in 0..5 {
            paginator
                .next_batch(&trip(), &PreferenceRecord::default(), &customer, &mut state)
                .await;
        }

        let batches = notifier.batches.lock().unwrap();
        let mut seen = std::collections::BTreeSet::new();
        for batch in batches.iter() {
            for id in batch {
                assert!(seen.insert(id.clone()), "driver {id} notified twice");
            }
        }
        assert_eq!(seen.len(), 25);
    }

    #[tokio::test]
    async fn short_page_reports_exhaustion() {
        let (paginator, _, _) = setup(13, PaginatorConfig::default());
        let mut state = state();
        let customer = state.identity.clone();

        let first = paginator
            .next_batch(&trip(), &PreferenceRecord::default(), &customer, &mut state)
            .await;
        assert!(matches!(
            first,
            BatchOutcome::Notified {
                exhausted: false,
                ..
            }
        ));

        let second = paginator
            .next_batch(&trip(), &PreferenceRecord::default(), &customer, &mut state)
            .await;
        let BatchOutcome::Notified {
            new_driver_ids,
            exhausted,
        } = second
        else {
            panic!("expected notified");
        };
        assert_eq!(new_driver_ids.len(), 3);
        assert!(exhausted, "a short page signals directory depletion");
    }

    #[tokio::test]
    async fn repeated_calls_terminate_within_the_ceiling() {
        // Pagination termination: an effectively unbounded directory still
        // stops at the per-trip ceiling.
        let (paginator, _, _) = setup(10_000, PaginatorConfig::default());
        let mut state = state();
        let customer = state.identity.clone();

        let mut rounds = 0;
        loop {
            rounds += 1;
            assert!(rounds <= 20, "paginator failed to terminate");
            match paginator
                .next_batch(&trip(), &PreferenceRecord::default(), &customer, &mut state)
                .await
            {
                BatchOutcome::Notified { exhausted: true, .. } | BatchOutcome::Exhausted => break,
                BatchOutcome::Notified { .. } => continue,
                other => panic!("unexpected outcome {other:?}"),
            }
        }
        assert_eq!(state.notified_driver_ids.len(), 50);

        // Further calls are a cheap no-op.
        assert_eq!(
            paginator
                .next_batch(&trip(), &PreferenceRecord::default(), &customer, &mut state)
                .await,
            BatchOutcome::Exhausted
        );
    }

    #[tokio::test]
    async fn preference_change_restarts_pagination() {
        let (paginator, _, _) = setup(100, PaginatorConfig::default());
        let mut state = state();
        let customer = state.identity.clone();

        paginator
            .next_batch(&trip(), &PreferenceRecord::default(), &customer, &mut state)
            .await;
        paginator
            .next_batch(&trip(), &PreferenceRecord::default(), &customer, &mut state)
            .await;
        assert_eq!(state.pagination_cursor, 3);

        let changed = PreferenceRecord {
            languages: vec!["Hindi".into()],
            ..Default::default()
        };
        paginator
            .next_batch(&trip(), &changed, &customer, &mut state)
            .await;
        // Cursor restarted at page one and advanced once.
        assert_eq!(state.pagination_cursor, 2);
        assert_eq!(state.notified_driver_ids.len(), 10);
    }

    #[tokio::test]
    async fn notify_failure_leaves_bookkeeping_untouched() {
        let (paginator, _, notifier) = setup(30, PaginatorConfig::default());
        let mut state = state();
        let customer = state.identity.clone();
        *notifier.fail.lock().unwrap() = true;

        let outcome = paginator
            .next_batch(&trip(), &PreferenceRecord::default(), &customer, &mut state)
            .await;
        assert_eq!(outcome, BatchOutcome::NotifyFailed);
        assert_eq!(state.pagination_cursor, 1);
        assert!(state.notified_driver_ids.is_empty());
    }

    #[tokio::test]
    async fn search_failure_is_reported_as_such() {
        let (paginator, directory, _) = setup(30, PaginatorConfig::default());
        let mut state = state();
        let customer = state.identity.clone();
        *directory.fail.lock().unwrap() = true;

        assert_eq!(
            paginator
                .next_batch(&trip(), &PreferenceRecord::default(), &customer, &mut state)
                .await,
            BatchOutcome::SearchFailed
        );
    }

    #[test]
    fn signature_is_stable_and_sensitive() {
        let trip = trip();
        let prefs = PreferenceRecord::default();
        assert_eq!(batch_signature(&trip, &prefs), batch_signature(&trip, &prefs));

        let other_prefs = PreferenceRecord {
            min_experience: Some(5),
            ..Default::default()
        };
        assert_ne!(
            batch_signature(&trip, &prefs),
            batch_signature(&trip, &other_prefs)
        );

        let mut other_trip = trip.clone();
        other_trip.route.drop = Place::city("Agra");
        assert_ne!(
            batch_signature(&trip, &prefs),
            batch_signature(&other_trip, &prefs)
        );
    }
}
