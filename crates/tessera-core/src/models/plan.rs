//! Plan model definition and related functionality.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PlanStatus;

/// Source tag stamped on every plan and planner message.
pub const PLANNER_SOURCE: &str = "PlannerAgent";

/// Goal text recorded on plans whose generation failed.
pub const FAILED_PLAN_GOAL: &str = "Error generating plan";

/// Summary recorded on plans whose generation failed.
pub const FAILED_PLAN_SUMMARY: &str = "No valid steps were generated.";

/// One decomposition of an objective into ordered steps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plan {
    /// Unique identifier for the plan
    pub id: Uuid,

    /// Session the plan belongs to
    pub session_id: String,

    /// User who submitted the objective
    pub user_id: String,

    /// Objective text as echoed back by the planner
    pub initial_goal: String,

    /// Overall status of the plan
    #[serde(default)]
    pub overall_status: PlanStatus,

    /// Originating agent
    pub source: String,

    /// Short natural-language description of the plan
    pub summary: Option<String>,

    /// Question for the user when the objective was ambiguous
    pub human_clarification_request: Option<String>,

    /// Timestamp when the plan was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the plan was last modified (UTC)
    pub updated_at: Timestamp,
}

impl Plan {
    /// Creates a new in-progress plan with a fresh identifier.
    pub fn in_progress(
        session_id: &str,
        user_id: &str,
        initial_goal: impl Into<String>,
        summary: impl Into<String>,
        human_clarification_request: Option<String>,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id: Uuid::new_v4(),
            session_id: session_id.to_string(),
            user_id: user_id.to_string(),
            initial_goal: initial_goal.into(),
            overall_status: PlanStatus::InProgress,
            source: PLANNER_SOURCE.to_string(),
            summary: Some(summary.into()),
            human_clarification_request,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates the plan that stands in for a failed generation. It always
    /// carries an explanatory summary and never has steps.
    pub fn failed(session_id: &str, user_id: &str) -> Self {
        let now = Timestamp::now();
        Self {
            id: Uuid::new_v4(),
            session_id: session_id.to_string(),
            user_id: user_id.to_string(),
            initial_goal: FAILED_PLAN_GOAL.to_string(),
            overall_status: PlanStatus::Failed,
            source: PLANNER_SOURCE.to_string(),
            summary: Some(FAILED_PLAN_SUMMARY.to_string()),
            human_clarification_request: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether generation of this plan failed.
    pub fn is_failed(&self) -> bool {
        self.overall_status == PlanStatus::Failed
    }
}
