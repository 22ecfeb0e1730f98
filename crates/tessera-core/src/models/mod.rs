//! Data models for plans, steps and session messages.
//!
//! Display implementations for these models live in
//! [`crate::display::models`] so that data structures stay separate from
//! presentation.
//!
//! # Lifecycle
//!
//! - A [`Plan`] is created exactly once per objective, either
//!   [`PlanStatus::InProgress`] with its steps or [`PlanStatus::Failed`] with
//!   none.
//! - Each [`Step`] starts [`StepStatus::Planned`] with approval
//!   [`HumanFeedbackStatus::Requested`]. An approval actor flips the approval
//!   status; the execution loop then dispatches eligible steps and marks them
//!   [`StepStatus::Completed`].
//!
//! # Examples
//!
//! ```rust
//! use tessera_core::models::{AgentType, HumanFeedbackStatus, Plan, Step, StepStatus};
//!
//! let plan = Plan::in_progress("s-1", "u-1", "Analyze AAPL earnings", "One step.", None);
//! let mut step = Step::planned(&plan, 0, "Pull the transcript", AgentType::EarningCallsAnalystAgent);
//! assert_eq!(step.status, StepStatus::Planned);
//! assert_eq!(step.human_approval_status, HumanFeedbackStatus::Requested);
//! assert!(!step.is_eligible());
//!
//! step.record_feedback(true, None);
//! assert!(step.is_eligible());
//! ```

pub mod agent;
pub mod message;
pub mod plan;
pub mod status;
pub mod step;


pub use agent::AgentType;
pub use message::AgentMessage;
pub use plan::{Plan, FAILED_PLAN_GOAL, FAILED_PLAN_SUMMARY, PLANNER_SOURCE};
pub use status::{HumanFeedbackStatus, PlanStatus, StepStatus};
pub use step::Step;
