//! Normalization and validation of the model's plan response.

use serde::Deserialize;
use thiserror::Error;

use crate::models::AgentType;

/// Why a model response could not be turned into a plan.
#[derive(Debug, Error)]
pub enum PlanParseError {
    #[error("response is not valid plan JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("step {index} names unknown agent '{agent}'")]
    UnknownAgent { index: usize, agent: String },

    #[error("step {index} assigns agent '{agent}', which is not available to this planner")]
    UnavailableAgent { index: usize, agent: AgentType },

    #[error("step {index} has an empty action")]
    EmptyAction { index: usize },
}

/// A validated step entry, in response order.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedStep {
    pub action: String,
    pub agent: AgentType,
}

/// A validated plan response.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredPlan {
    pub initial_goal: String,
    pub steps: Vec<PlannedStep>,
    pub summary: String,
    pub human_clarification_request: Option<String>,
}

#[derive(Deserialize)]
struct RawStep {
    action: String,
    agent: String,
}

#[derive(Deserialize)]
struct RawPlan {
    initial_goal: String,
    steps: Vec<RawStep>,
    summary_plan_and_steps: String,
    #[serde(default)]
    human_clarification_request: Option<String>,
}

/// Strips surrounding whitespace and a Markdown code fence, if present.
///
/// Handles both ```` ```json ```` and bare ```` ``` ```` fences. Applying it
/// twice gives the same result as applying it once.
pub fn normalize_response(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

/// Parses and validates a raw model response against the plan schema.
///
/// Every step's agent must be one of `available`; matching is exact.
pub fn parse_plan_response(
    raw: &str,
    available: &[AgentType],
) -> Result<StructuredPlan, PlanParseError> {
    let parsed: RawPlan = serde_json::from_str(normalize_response(raw))?;

    let steps = parsed
        .steps
        .into_iter()
        .enumerate()
        .map(|(index, step)| {
            let agent = step
                .agent
                .parse::<AgentType>()
                .map_err(|_| PlanParseError::UnknownAgent {
                    index,
                    agent: step.agent.clone(),
                })?;
            if !available.contains(&agent) {
                return Err(PlanParseError::UnavailableAgent { index, agent });
            }
            let action = step.action.trim();
            if action.is_empty() {
                return Err(PlanParseError::EmptyAction { index });
            }
            Ok(PlannedStep {
                action: action.to_string(),
                agent,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(StructuredPlan {
        initial_goal: parsed.initial_goal,
        steps,
        summary: parsed.summary_plan_and_steps,
        human_clarification_request: parsed
            .human_clarification_request
            .filter(|q| !q.trim().is_empty()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{"initial_goal":"Analyze AAPL earnings","steps":[{"action":"Pull latest earnings call transcript","agent":"EarningCallsAnalystAgent"},{"action":"Summarize guidance","agent":"GenericAgent"}],"summary_plan_and_steps":"Two-step earnings analysis.","human_clarification_request":null}"#;

    #[test]
    fn test_normalize_plain_text() {
        assert_eq!(normalize_response("  {\"a\":1}\n"), "{\"a\":1}");
    }

    #[test]
    fn test_normalize_json_fence() {
        let fenced = "```json\n{\"a\":1}\n```";
        assert_eq!(normalize_response(fenced), "{\"a\":1}");
    }

    #[test]
    fn test_normalize_bare_fence() {
        assert_eq!(normalize_response("```\n{\"a\":1}\n```\n"), "{\"a\":1}");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for input in [VALID, "```json\n{\"a\":1}\n```", "  plain  ", "```json"] {
            let once = normalize_response(input);
            assert_eq!(normalize_response(once), once);
        }
    }

    #[test]
    fn test_parse_valid_response_preserves_order() {
        let plan = parse_plan_response(VALID, &AgentType::ALL).unwrap();
        assert_eq!(plan.initial_goal, "Analyze AAPL earnings");
        assert_eq!(plan.summary, "Two-step earnings analysis.");
        assert!(plan.human_clarification_request.is_none());
        assert_eq!(
            plan.steps,
            vec![
                PlannedStep {
                    action: "Pull latest earnings call transcript".to_string(),
                    agent: AgentType::EarningCallsAnalystAgent,
                },
                PlannedStep {
                    action: "Summarize guidance".to_string(),
                    agent: AgentType::GenericAgent,
                },
            ]
        );
    }

    #[test]
    fn test_fenced_and_unfenced_parse_identically() {
        let fenced = format!("```json\n{VALID}\n```");
        assert_eq!(
            parse_plan_response(&fenced, &AgentType::ALL).unwrap(),
            parse_plan_response(VALID, &AgentType::ALL).unwrap()
        );
    }

    #[test]
    fn test_clarification_is_optional() {
        let raw = r#"{"initial_goal":"g","steps":[],"summary_plan_and_steps":"s"}"#;
        let plan = parse_plan_response(raw, &AgentType::ALL).unwrap();
        assert!(plan.human_clarification_request.is_none());
        assert!(plan.steps.is_empty());

        let raw = r#"{"initial_goal":"g","steps":[],"summary_plan_and_steps":"s","human_clarification_request":"Which quarter?"}"#;
        let plan = parse_plan_response(raw, &AgentType::ALL).unwrap();
        assert_eq!(plan.human_clarification_request.as_deref(), Some("Which quarter?"));
    }

    #[test]
    fn test_rejects_non_json() {
        assert!(matches!(
            parse_plan_response("not json at all", &AgentType::ALL),
            Err(PlanParseError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_rejects_missing_required_field() {
        let raw = r#"{"initial_goal":"g","steps":[]}"#;
        assert!(matches!(
            parse_plan_response(raw, &AgentType::ALL),
            Err(PlanParseError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_rejects_unknown_agent() {
        let raw = r#"{"initial_goal":"g","steps":[{"action":"trade","agent":"TraderAgent"}],"summary_plan_and_steps":"s"}"#;
        match parse_plan_response(raw, &AgentType::ALL) {
            Err(PlanParseError::UnknownAgent { index, agent }) => {
                assert_eq!(index, 0);
                assert_eq!(agent, "TraderAgent");
            }
            other => panic!("expected UnknownAgent, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_agent_outside_configured_set() {
        let raw = r#"{"initial_goal":"g","steps":[{"action":"ask","agent":"HumanAgent"}],"summary_plan_and_steps":"s"}"#;
        assert!(matches!(
            parse_plan_response(raw, &[AgentType::GenericAgent]),
            Err(PlanParseError::UnavailableAgent {
                agent: AgentType::HumanAgent,
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_blank_action() {
        let raw = r#"{"initial_goal":"g","steps":[{"action":"   ","agent":"GenericAgent"}],"summary_plan_and_steps":"s"}"#;
        assert!(matches!(
            parse_plan_response(raw, &AgentType::ALL),
            Err(PlanParseError::EmptyAction { index: 0 })
        ));
    }
}
