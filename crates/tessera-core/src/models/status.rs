//! Status enumerations for plans and steps.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Type-safe enumeration of plan statuses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    /// Plan was generated and its steps are awaiting approval or execution
    #[default]
    InProgress,

    /// Every step of the plan has been carried out
    Completed,

    /// Plan generation failed; the plan has no steps
    Failed,
}

impl FromStr for PlanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "in_progress" | "inprogress" => Ok(PlanStatus::InProgress),
            "completed" => Ok(PlanStatus::Completed),
            "failed" => Ok(PlanStatus::Failed),
            _ => Err(format!("Invalid plan status: {s}")),
        }
    }
}

impl PlanStatus {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::InProgress => "in_progress",
            PlanStatus::Completed => "completed",
            PlanStatus::Failed => "failed",
        }
    }
}

/// Type-safe enumeration of step execution statuses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Step was produced by the planner and has not run
    #[default]
    Planned,

    /// Step is waiting on human feedback before it can proceed
    AwaitingFeedback,

    /// Step was approved for execution
    Approved,

    /// Step was rejected and will never run
    Rejected,

    /// Step was handed to its agent
    ActionRequested,

    /// Step was carried out by its agent
    Completed,

    /// Step execution failed
    Failed,
}

impl FromStr for StepStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "planned" => Ok(StepStatus::Planned),
            "awaiting_feedback" => Ok(StepStatus::AwaitingFeedback),
            "approved" => Ok(StepStatus::Approved),
            "rejected" => Ok(StepStatus::Rejected),
            "action_requested" => Ok(StepStatus::ActionRequested),
            "completed" => Ok(StepStatus::Completed),
            "failed" => Ok(StepStatus::Failed),
            _ => Err(format!("Invalid step status: {s}")),
        }
    }
}

impl StepStatus {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Planned => "planned",
            StepStatus::AwaitingFeedback => "awaiting_feedback",
            StepStatus::Approved => "approved",
            StepStatus::Rejected => "rejected",
            StepStatus::ActionRequested => "action_requested",
            StepStatus::Completed => "completed",
            StepStatus::Failed => "failed",
        }
    }

    /// Whether the execution loop may still pick up a step in this status.
    pub fn is_dispatchable(&self) -> bool {
        matches!(self, StepStatus::Planned | StepStatus::Approved)
    }

    /// Whether a human decision may still change a step in this status.
    ///
    /// Once a step has been handed to its agent its execution status is final.
    pub fn accepts_feedback(&self) -> bool {
        !matches!(
            self,
            StepStatus::ActionRequested | StepStatus::Completed | StepStatus::Failed
        )
    }

    /// Get status with consistent icon formatting for display.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tessera_core::models::StepStatus;
    ///
    /// assert_eq!(StepStatus::Completed.with_icon(), "✓ Completed");
    /// assert_eq!(StepStatus::Planned.with_icon(), "○ Planned");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            StepStatus::Planned => "○ Planned",
            StepStatus::AwaitingFeedback => "? Awaiting Feedback",
            StepStatus::Approved => "➤ Approved",
            StepStatus::Rejected => "✗ Rejected",
            StepStatus::ActionRequested => "➤ Action Requested",
            StepStatus::Completed => "✓ Completed",
            StepStatus::Failed => "✗ Failed",
        }
    }
}

/// Human approval state of a step.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum HumanFeedbackStatus {
    /// Approval was requested and no decision was recorded yet
    #[default]
    Requested,

    /// A human approved the step
    Approved,

    /// A human rejected the step
    Rejected,
}

impl FromStr for HumanFeedbackStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "requested" => Ok(HumanFeedbackStatus::Requested),
            "approved" | "accepted" => Ok(HumanFeedbackStatus::Approved),
            "rejected" => Ok(HumanFeedbackStatus::Rejected),
            _ => Err(format!("Invalid approval status: {s}")),
        }
    }
}

impl HumanFeedbackStatus {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            HumanFeedbackStatus::Requested => "requested",
            HumanFeedbackStatus::Approved => "approved",
            HumanFeedbackStatus::Rejected => "rejected",
        }
    }
}
