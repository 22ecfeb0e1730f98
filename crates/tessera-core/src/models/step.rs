//! Step model definition and related functionality.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AgentType, HumanFeedbackStatus, Plan, StepStatus};
use crate::error::{Result, TesseraError};

/// Represents an individual unit of work within a plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Step {
    /// Unique identifier for the step
    pub id: Uuid,

    /// ID of the parent plan
    pub plan_id: Uuid,

    /// Session of the parent plan
    pub session_id: String,

    /// User of the parent plan
    pub user_id: String,

    /// Imperative instruction for the agent
    pub action: String,

    /// Agent that owns the step
    pub agent: AgentType,

    /// Current execution status of the step
    pub status: StepStatus,

    /// Human approval state
    pub human_approval_status: HumanFeedbackStatus,

    /// Free-text feedback recorded alongside an approval decision
    #[serde(skip_serializing_if = "Option::is_none")]
    pub human_feedback: Option<String>,

    /// Order of the step within the plan (0-indexed)
    pub order: u32,

    /// Timestamp when the step was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the step was last updated (UTC)
    pub updated_at: Timestamp,
}

impl Step {
    /// Creates a freshly planned step for `plan` at position `order`.
    ///
    /// New steps always start `planned` with approval `requested`.
    pub fn planned(plan: &Plan, order: u32, action: impl Into<String>, agent: AgentType) -> Self {
        let now = Timestamp::now();
        Self {
            id: Uuid::new_v4(),
            plan_id: plan.id,
            session_id: plan.session_id.clone(),
            user_id: plan.user_id.clone(),
            action: action.into(),
            agent,
            status: StepStatus::Planned,
            human_approval_status: HumanFeedbackStatus::Requested,
            human_feedback: None,
            order,
            created_at: now,
            updated_at: now,
        }
    }

    /// Eligibility predicate of the execution loop: a human approved the
    /// step and it has not yet run or been closed out.
    pub fn is_eligible(&self) -> bool {
        self.human_approval_status == HumanFeedbackStatus::Approved
            && self.status.is_dispatchable()
    }

    /// Records a human approval decision on the step.
    ///
    /// # Errors
    ///
    /// Returns `TesseraError::InvalidInput` if the step has already been
    /// dispatched, completed or failed. The step is left unchanged.
    pub fn record_feedback(&mut self, approved: bool, feedback: Option<String>) -> Result<()> {
        if !self.status.accepts_feedback() {
            return Err(TesseraError::invalid_input("status").with_reason(format!(
                "step {} is already {} and can no longer be approved or rejected",
                self.id,
                self.status.as_str()
            )));
        }

        if approved {
            self.human_approval_status = HumanFeedbackStatus::Approved;
            self.status = StepStatus::Approved;
        } else {
            self.human_approval_status = HumanFeedbackStatus::Rejected;
            self.status = StepStatus::Rejected;
        }
        self.human_feedback = feedback;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Marks the step as carried out.
    pub fn mark_completed(&mut self) {
        self.status = StepStatus::Completed;
        self.updated_at = Timestamp::now();
    }
}
