// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded-retry and escalation primitives for external calls.
//!
//! The tally itself lives in conversation state ([`sawari_core::ErrorTally`])
//! so it survives across turns; this crate owns the ladder that maps
//! consecutive same-kind failures to progressively simpler retries and,
//! eventually, a terminal human-support escalation. The ladder is consulted
//! by the calling component, not applied by the policy itself.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use sawari_core::{ErrorTally, FilterTier, SawariError};

/// What the caller should do next, given the current failure tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escalation {
    /// Retry the call, offering the given filter tier.
    Retry(FilterTier),
    /// Stop retrying; surface the human-support outcome.
    Escalate,
}

/// The escalation ladder.
///
/// Stateless by design: the failure count is read from the persisted tally,
/// so the ladder position survives process restarts along with the session.
#[derive(Debug, Clone, Copy, Default)]
pub struct EscalationPolicy;

impl EscalationPolicy {
    /// Maps a failure tally to the next step.
    ///
    /// Up to 2 consecutive failures retry with the full filter set, a 3rd
    /// with vehicle categories only, a 4th with no filters at all; anything
    /// beyond stops retrying. Each tier's filter set is a subset of the
    /// previous one, so repeated failure strictly simplifies the call.
    pub fn next_step(&self, tally: &ErrorTally) -> Escalation {
        match tally.count {
            0..=2 => Escalation::Retry(FilterTier::Full),
            3 => Escalation::Retry(FilterTier::VehicleOnly),
            4 => Escalation::Retry(FilterTier::Bare),
            _ => Escalation::Escalate,
        }
    }
}

/// Runs a future with a deadline; expiry is reported as
/// [`SawariError::Timeout`], which the tally treats identically to any
/// other call failure.
pub async fn with_timeout<T, F>(duration: Duration, future: F) -> Result<T, SawariError>
where
    F: Future<Output = Result<T, SawariError>>,
{
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => {
            warn!(?duration, "external call timed out");
            Err(SawariError::Timeout { duration })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sawari_core::{CallKind, PreferenceRecord, VehicleCategory};

    fn tally_after(failures: u32) -> ErrorTally {
        let mut tally = ErrorTally::default();
        for _ in 0..failures {
            tally.record_failure(CallKind::DriverSearch);
        }
        tally
    }

    #[test]
    fn ladder_walks_full_vehicle_bare_escalate() {
        let policy = EscalationPolicy;
        // Three failures can all happen with the full filter set before the
        // ladder starts simplifying.
        for failures in 0..=2 {
            assert_eq!(
                policy.next_step(&tally_after(failures)),
                Escalation::Retry(FilterTier::Full)
            );
        }
        assert_eq!(
            policy.next_step(&tally_after(3)),
            Escalation::Retry(FilterTier::VehicleOnly)
        );
        assert_eq!(
            policy.next_step(&tally_after(4)),
            Escalation::Retry(FilterTier::Bare)
        );
        assert_eq!(policy.next_step(&tally_after(5)), Escalation::Escalate);
        assert_eq!(policy.next_step(&tally_after(10)), Escalation::Escalate);
    }

    #[test]
    fn filter_sets_shrink_monotonically_down_the_ladder() {
        // After n failures the offered filter set must be a subset of the
        // set offered after n-1 failures.
        let prefs = PreferenceRecord {
            vehicle_categories: vec![VehicleCategory::Suv],
            languages: vec!["Hindi".into()],
            min_experience: Some(5),
            is_pet_allowed: Some(true),
            ..Default::default()
        };
        let policy = EscalationPolicy;

        let mut previous: Option<PreferenceRecord> = None;
        for failures in 0..5 {
            let Escalation::Retry(tier) = policy.next_step(&tally_after(failures)) else {
                panic!("ladder escalated too early at {failures} failures");
            };
            let offered = prefs.reduced(tier);
            if let Some(prev) = &previous {
                assert!(
                    is_subset(&offered, prev),
                    "tier after {failures} failures must be a subset of the previous tier"
                );
            }
            previous = Some(offered);
        }
    }

    fn is_subset(smaller: &PreferenceRecord, larger: &PreferenceRecord) -> bool {
        let small = serde_json::to_value(smaller).unwrap();
        let large = serde_json::to_value(larger).unwrap();
        small
            .as_object()
            .unwrap()
            .iter()
            .all(|(key, value)| match value {
                v if v.is_null() => true,
                serde_json::Value::Array(items) if items.is_empty() => true,
                v => large.get(key) == Some(v),
            })
    }

    #[test]
    fn success_resets_ladder_to_full() {
        let policy = EscalationPolicy;
        let mut tally = tally_after(3);
        tally.record_success();
        assert_eq!(
            policy.next_step(&tally),
            Escalation::Retry(FilterTier::Full)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_is_reported_as_timeout_error() {
        let result: Result<(), SawariError> = with_timeout(Duration::from_secs(5), async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(SawariError::Timeout { .. })));
    }

    #[tokio::test]
    async fn fast_calls_pass_through() {
        let result = with_timeout(Duration::from_secs(5), async { Ok(42u32) }).await;
        assert_eq!(result.unwrap(), 42);
    }
}
