// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The orchestration loop: one execution per inbound message.
//!
//! Alternates between invoking the reasoning oracle (plan) and executing
//! requested actions (act) until the oracle produces a plain reply. Side
//! effects are confined to the act step; planning never mutates external
//! resources. A hard iteration ceiling and an overall per-message deadline
//! bound the loop; both surface canned replies without corrupting the
//! persisted state.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tracing::{debug, info, warn};

use sawari_config::SawariConfig;
use sawari_core::{
    ActionKind, ActionRequest, CallKind, ConversationState, DriverDirectory, InboundMessage,
    Notifier, OracleAdapter, OracleDecision, ReplyEnvelope, SawariError, SessionStore,
    TripApi, TripStatus, Turn,
};
use sawari_dispatch::{BatchOutcome, DriverBatchPaginator, PaginatorConfig};
use sawari_filters::{normalize, GroupThresholds};
use sawari_oracle::render_context;
use sawari_resilience::{Escalation, EscalationPolicy};
use sawari_trip::{
    CancelOutcome, CreateOutcome, DraftRejection, ModifyOutcome, TripLifecycle,
};

use crate::actions;
use crate::replies;

/// Reserved control phrases that wipe the session instead of reaching the
/// oracle. Matched against the exact trimmed, lowercased message text.
const RESET_COMMANDS: &[&str] = &["reset", "start over", "restart"];

/// Loop limits and conversational knobs, extracted from config once.
#[derive(Debug, Clone)]
pub struct AgentSettings {
    pub max_iterations: u32,
    pub message_deadline: Duration,
    pub session_ttl: Duration,
    pub thresholds: GroupThresholds,
    pub support_contact: String,
}

impl AgentSettings {
    pub fn from_config(config: &SawariConfig) -> Self {
        Self {
            max_iterations: config.agent.max_iterations,
            message_deadline: Duration::from_secs(config.agent.message_deadline_secs),
            session_ttl: Duration::from_secs(config.store.session_ttl_secs),
            thresholds: GroupThresholds {
                large: config.filters.large_group_threshold,
                medium: config.filters.medium_group_threshold,
            },
            support_contact: config.agent.support_contact.clone(),
        }
    }
}

/// Lifecycle outcomes recorded during one turn; they drive the reply
/// envelope flags instead of reply-text inspection.
#[derive(Debug, Default)]
struct TurnFlags {
    trip_created: bool,
    trip_cancelled: bool,
}

/// What the loop does after one executed action.
enum ActionStep {
    /// Feed the outcome back to the oracle and replan.
    Continue(String),
    /// Stop planning; this is the user-facing reply.
    Terminal(String),
}

/// The turn controller. All collaborators are injected; the agent holds no
/// ambient global state.
pub struct Agent {
    oracle: Arc<dyn OracleAdapter + Send + Sync>,
    store: Arc<dyn SessionStore + Send + Sync>,
    lifecycle: TripLifecycle,
    paginator: DriverBatchPaginator,
    policy: EscalationPolicy,
    settings: AgentSettings,
}

impl Agent {
    pub fn new(
        oracle: Arc<dyn OracleAdapter + Send + Sync>,
        store: Arc<dyn SessionStore + Send + Sync>,
        trip_api: Arc<dyn TripApi + Send + Sync>,
        directory: Arc<dyn DriverDirectory + Send + Sync>,
        notifier: Arc<dyn Notifier + Send + Sync>,
        config: &SawariConfig,
    ) -> Self {
        let paginator = DriverBatchPaginator::new(
            directory,
            notifier,
            PaginatorConfig {
                page_size: config.dispatch.page_size,
                max_drivers_per_trip: config.dispatch.max_drivers_per_trip,
            },
        );
        Self {
            oracle,
            store,
            lifecycle: TripLifecycle::new(trip_api),
            paginator,
            policy: EscalationPolicy,
            settings: AgentSettings::from_config(config),
        }
    }

    /// Processes one inbound message end to end: load state, run the
    /// plan/act loop, persist, reply.
    pub async fn handle_message(
        &self,
        inbound: InboundMessage,
    ) -> Result<ReplyEnvelope, SawariError> {
        let user_id = inbound.user_id.clone();

        if is_reset_command(&inbound.text) {
            let deleted = self.store.delete(&user_id).await?;
            info!(deleted, "session reset requested");
            return Ok(ReplyEnvelope::text(replies::reset()));
        }

        let mut state = match self.store.get(&user_id).await? {
            Some(state) => state,
            None => {
                debug!("creating session");
                ConversationState::new(inbound.identity.clone(), inbound.source_channel.clone())
            }
        };
        refresh_from_envelope(&mut state, &inbound);
        state.push_turn(Turn::User {
            text: inbound.text.clone(),
        });

        let mut flags = TurnFlags::default();
        let reply_text = match tokio::time::timeout(
            self.settings.message_deadline,
            self.run_loop(&mut state, &mut flags),
        )
        .await
        {
            Ok(reply) => reply,
            Err(_) => {
                // Effects of completed actions are retained; external calls
                // are not transactional, so nothing is rolled back.
                warn!("message deadline expired mid-turn");
                replies::still_working()
            }
        };

        self.store
            .put(&user_id, &state, self.settings.session_ttl)
            .await?;

        Ok(ReplyEnvelope {
            reply_text,
            trip_created: flags.trip_created,
            trip_cancelled: flags.trip_cancelled,
        })
    }

    /// Lists user ids with live sessions (admin surface).
    pub async fn active_sessions(&self) -> Result<Vec<String>, SawariError> {
        self.store.active_user_ids().await
    }

    /// The plan/act loop. Always produces a user-facing reply; faults
    /// become canned replies rather than errors.
    async fn run_loop(&self, state: &mut ConversationState, flags: &mut TurnFlags) -> String {
        let today = chrono::Utc::now().date_naive();

        for iteration in 0..self.settings.max_iterations {
            let context = render_context(state, today);
            let decision = match self.oracle.invoke(&context, &state.turn_log).await {
                Ok(decision) => {
                    // An oracle success only clears an oracle failure streak;
                    // action-call streaks keep their ladder position.
                    if state.error_tally.kind == Some(CallKind::Oracle) {
                        state.error_tally.record_success();
                    }
                    decision
                }
                Err(e) => {
                    warn!(error = %e, "oracle invocation failed");
                    state.error_tally.record_failure(CallKind::Oracle);
                    let reply = match self.policy.next_step(&state.error_tally) {
                        Escalation::Escalate => {
                            replies::support(&self.settings.support_contact)
                        }
                        Escalation::Retry(_) => replies::apology(),
                    };
                    state.push_turn(Turn::Assistant {
                        text: reply.clone(),
                    });
                    return reply;
                }
            };

            match decision {
                OracleDecision::Reply(text) => {
                    let text = if text.trim().is_empty() {
                        replies::fallback()
                    } else {
                        text
                    };
                    state.push_turn(Turn::Assistant { text: text.clone() });
                    return text;
                }
                OracleDecision::Act(requests) => {
                    debug!(iteration, actions = requests.len(), "executing actions");
                    for request in requests {
                        match self.execute(&request, state, flags).await {
                            ActionStep::Continue(outcome) => {
                                state.push_turn(Turn::ActionResult {
                                    action: request.action,
                                    outcome,
                                });
                            }
                            ActionStep::Terminal(reply) => {
                                state.push_turn(Turn::Assistant {
                                    text: reply.clone(),
                                });
                                return reply;
                            }
                        }
                    }
                }
            }
        }

        warn!(
            ceiling = self.settings.max_iterations,
            "plan/act iteration ceiling reached"
        );
        let reply = replies::support(&self.settings.support_contact);
        state.push_turn(Turn::Assistant {
            text: reply.clone(),
        });
        reply
    }

    /// Dispatches one action request to its component.
    async fn execute(
        &self,
        request: &ActionRequest,
        state: &mut ConversationState,
        flags: &mut TurnFlags,
    ) -> ActionStep {
        match request.action {
            ActionKind::CreateTrip => self.do_create(&request.arguments, state, flags).await,
            ActionKind::ModifyTrip => self.do_modify(&request.arguments, state, flags).await,
            ActionKind::CancelTrip => self.do_cancel(state, flags).await,
            ActionKind::SearchAndNotifyDrivers => self.do_search(&request.arguments, state).await,
        }
    }

    async fn do_create(
        &self,
        args: &serde_json::Value,
        state: &mut ConversationState,
        flags: &mut TurnFlags,
    ) -> ActionStep {
        self.absorb_preferences(args, state);

        let mut draft = actions::trip_draft(args);
        // Location hints come from the input channel, never the oracle.
        draft.pickup_detail = state.pickup_hint.clone();
        draft.drop_detail = state.drop_hint.clone();

        match self
            .lifecycle
            .create(
                draft,
                &state.identity,
                &state.preferences,
                &state.source_channel,
            )
            .await
        {
            CreateOutcome::Created(record) => {
                state.trip = Some(record);
                state.reset_pagination();
                state.error_tally.record_success();
                flags.trip_created = true;
                ActionStep::Continue(
                    json!({
                        "status": "success",
                        "message": "Trip created. Drivers can now be searched and notified.",
                    })
                    .to_string(),
                )
            }
            CreateOutcome::Rejected(rejection) => {
                ActionStep::Continue(rejection_outcome(&rejection))
            }
            CreateOutcome::Failed => self.failure_step(CallKind::TripCreate, state),
        }
    }

    async fn do_modify(
        &self,
        args: &serde_json::Value,
        state: &mut ConversationState,
        flags: &mut TurnFlags,
    ) -> ActionStep {
        self.absorb_preferences(args, state);
        let changes = actions::trip_changes(args);

        match self
            .lifecycle
            .modify(
                state.trip.as_ref(),
                changes,
                &state.identity,
                &state.preferences,
                &state.source_channel,
            )
            .await
        {
            ModifyOutcome::Modified(record) => {
                state.trip = Some(record);
                state.reset_pagination();
                state.error_tally.record_success();
                ActionStep::Continue(
                    json!({
                        "status": "success",
                        "message": "Trip updated; the booking now reflects the requested changes.",
                    })
                    .to_string(),
                )
            }
            ModifyOutcome::Rejected(rejection) => {
                ActionStep::Continue(rejection_outcome(&rejection))
            }
            ModifyOutcome::NoActiveTrip => ActionStep::Continue(
                json!({
                    "status": "no_active_trip",
                    "message": "There is no trip to modify; create one instead.",
                })
                .to_string(),
            ),
            ModifyOutcome::Failed => self.failure_step(CallKind::TripCreate, state),
        }
    }

    async fn do_cancel(
        &self,
        state: &mut ConversationState,
        flags: &mut TurnFlags,
    ) -> ActionStep {
        match self.lifecycle.cancel(state.trip.as_ref()).await {
            CancelOutcome::Cancelled { .. } => {
                // Preferences survive cancellation; the next trip reuses them.
                if let Some(trip) = &mut state.trip {
                    trip.status = TripStatus::Cancelled;
                }
                state.reset_pagination();
                state.error_tally.record_success();
                flags.trip_cancelled = true;
                ActionStep::Continue(
                    json!({
                        "status": "success",
                        "message": "The trip has been cancelled.",
                    })
                    .to_string(),
                )
            }
            CancelOutcome::NothingToCancel => ActionStep::Continue(
                json!({
                    "status": "nothing_to_cancel",
                    "message": "There is no active trip to cancel.",
                })
                .to_string(),
            ),
            CancelOutcome::Failed => self.failure_step(CallKind::TripCancel, state),
        }
    }

    async fn do_search(
        &self,
        args: &serde_json::Value,
        state: &mut ConversationState,
    ) -> ActionStep {
        self.absorb_preferences(args, state);

        let Some(trip) = state.trip.clone().filter(|t| t.is_active()) else {
            return ActionStep::Continue(
                json!({
                    "status": "no_active_trip",
                    "message": "Create a trip before searching for drivers.",
                })
                .to_string(),
            );
        };

        // The ladder picks how much of the preference record this attempt
        // may offer; past the ladder we stop calling out entirely.
        let tier = match self.policy.next_step(&state.error_tally) {
            Escalation::Escalate => {
                return ActionStep::Terminal(replies::support(&self.settings.support_contact));
            }
            Escalation::Retry(tier) => tier,
        };
        let filters = state.preferences.reduced(tier);
        let customer = state.identity.clone();

        match self
            .paginator
            .next_batch(&trip, &filters, &customer, state)
            .await
        {
            BatchOutcome::Notified {
                new_driver_ids,
                exhausted,
            } => {
                state.error_tally.record_success();
                ActionStep::Continue(
                    json!({
                        "status": "success",
                        "notified": new_driver_ids.len(),
                        "exhausted": exhausted,
                    })
                    .to_string(),
                )
            }
            BatchOutcome::Exhausted => ActionStep::Continue(
                json!({
                    "status": "exhausted",
                    "message": "All available drivers for this trip have already been notified.",
                })
                .to_string(),
            ),
            BatchOutcome::SearchFailed => self.failure_step(CallKind::DriverSearch, state),
            BatchOutcome::NotifyFailed => self.failure_step(CallKind::DriverNotify, state),
        }
    }

    /// Normalizes any preferences and passenger count carried by the action
    /// arguments into conversation state. The normalizer is the only writer
    /// of the preference record.
    fn absorb_preferences(&self, args: &serde_json::Value, state: &mut ConversationState) {
        if let Some(count) = actions::passenger_count(args) {
            state.passenger_count = Some(count);
        }
        let raw = actions::preference_map(args);
        if !raw.is_empty() || state.passenger_count.is_some() {
            state.preferences = normalize(
                &state.preferences,
                &raw,
                state.passenger_count,
                self.settings.thresholds,
            );
        }
    }

    /// Records an external-call failure and decides between replanning and
    /// terminal escalation.
    fn failure_step(&self, kind: CallKind, state: &mut ConversationState) -> ActionStep {
        state.error_tally.record_failure(kind);
        match self.policy.next_step(&state.error_tally) {
            Escalation::Escalate => {
                ActionStep::Terminal(replies::support(&self.settings.support_contact))
            }
            Escalation::Retry(_) => ActionStep::Continue(
                json!({
                    "status": "error",
                    "message": "The last call failed. It can be retried, possibly with fewer filters.",
                })
                .to_string(),
            ),
        }
    }
}

/// Renders a draft rejection as an action outcome for the oracle; the
/// oracle turns it into a question for the user.
fn rejection_outcome(rejection: &DraftRejection) -> String {
    match rejection {
        DraftRejection::MissingFields(fields) => json!({
            "status": "incomplete",
            "missing": fields.iter().map(|f| f.user_name()).collect::<Vec<_>>(),
            "message": "Ask the user for the missing fields before retrying.",
        })
        .to_string(),
        DraftRejection::StateNameAsCity(name) => json!({
            "status": "invalid",
            "message": format!(
                "`{name}` is a state, not a city. Ask the user for the specific city."
            ),
        })
        .to_string(),
        DraftRejection::ReturnNotAfterStart => json!({
            "status": "invalid",
            "message": "The return date must be after the start date. Ask the user for a valid return date.",
        })
        .to_string(),
    }
}

/// Exact-text reserved control command check (case-insensitive).
fn is_reset_command(text: &str) -> bool {
    RESET_COMMANDS.contains(&text.trim().to_lowercase().as_str())
}

/// Refreshes identity, source channel, and location hints from the
/// envelope. Envelope values win over stored ones, but empty envelope
/// fields never blank out known identity.
fn refresh_from_envelope(state: &mut ConversationState, inbound: &InboundMessage) {
    if !inbound.identity.id.is_empty() {
        state.identity.id = inbound.identity.id.clone();
    }
    if !inbound.identity.name.is_empty() {
        state.identity.name = inbound.identity.name.clone();
    }
    if !inbound.identity.phone.is_empty() {
        state.identity.phone = inbound.identity.phone.clone();
    }
    if !inbound.identity.profile_image.is_empty() {
        state.identity.profile_image = inbound.identity.profile_image.clone();
    }
    if !inbound.source_channel.is_empty() {
        state.source_channel = inbound.source_channel.clone();
    }
    if inbound.pickup_hint.is_some() {
        state.pickup_hint = inbound.pickup_hint.clone();
    }
    if inbound.drop_hint.is_some() {
        state.drop_hint = inbound.drop_hint.clone();
    }
}
