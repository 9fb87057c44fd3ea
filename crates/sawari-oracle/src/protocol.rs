// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the planning service API.

use serde::{Deserialize, Serialize};

use sawari_core::{ActionRequest, OracleDecision, SawariError, Turn};

/// Request body for one planning step.
#[derive(Debug, Serialize)]
pub struct PlanRequest<'a> {
    pub system_context: &'a str,
    pub turns: &'a [Turn],
}

/// Response body: either a plain reply or a batch of action requests.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlanResponse {
    Reply { text: String },
    Actions { actions: Vec<ActionRequest> },
}

impl PlanResponse {
    /// Converts the wire response into the core decision type.
    ///
    /// An empty action list is malformed: the planner asked to act but
    /// named no action, which would spin the plan/act loop for nothing.
    pub fn into_decision(self) -> Result<OracleDecision, SawariError> {
        match self {
            PlanResponse::Reply { text } => Ok(OracleDecision::Reply(text)),
            PlanResponse::Actions { actions } if actions.is_empty() => {
                Err(SawariError::Oracle {
                    message: "planner returned an empty action list".into(),
                    source: None,
                })
            }
            PlanResponse::Actions { actions } => Ok(OracleDecision::Act(actions)),
        }
    }
}

/// Error envelope returned by the planning service.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// Error detail within an [`ApiErrorResponse`].
#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(rename = "type")]
    pub type_: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use sawari_core::ActionKind;

    #[test]
    fn reply_response_decodes() {
        let response: PlanResponse =
            serde_json::from_str(r#"{"type":"reply","text":"Where to?"}"#).unwrap();
        assert_eq!(
            response.into_decision().unwrap(),
            OracleDecision::Reply("Where to?".into())
        );
    }

    #[test]
    fn actions_response_decodes_with_arguments() {
        let json = r#"{
            "type": "actions",
            "actions": [
                {"action": "create_trip", "arguments": {"pickup_city": "Jaipur"}}
            ]
        }"#;
        let response: PlanResponse = serde_json::from_str(json).unwrap();
        let OracleDecision::Act(actions) = response.into_decision().unwrap() else {
            panic!("expected actions");
        };
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].action, ActionKind::CreateTrip);
        assert_eq!(actions[0].arguments["pickup_city"], "Jaipur");
    }

    #[test]
    fn empty_action_list_is_rejected() {
        let response: PlanResponse =
            serde_json::from_str(r#"{"type":"actions","actions":[]}"#).unwrap();
        assert!(response.into_decision().is_err());
    }

    #[test]
    fn unknown_action_name_fails_decode() {
        let json = r#"{"type":"actions","actions":[{"action":"rm_rf_slash"}]}"#;
        assert!(serde_json::from_str::<PlanResponse>(json).is_err());
    }
}
