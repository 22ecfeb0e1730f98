//! Display implementations for domain models.
//!
//! All output is markdown so the CLI can hand it straight to the terminal
//! renderer.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::models::{AgentMessage, HumanFeedbackStatus, Plan, PlanStatus, Step, StepStatus};

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for HumanFeedbackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Compact form used in plan listings.
impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {} (ID: {})", self.initial_goal, self.id)?;
        writeln!(f)?;
        writeln!(f, "- **Status**: {}", self.overall_status)?;
        writeln!(f, "- **Session**: {}", self.session_id)?;
        if let Some(summary) = &self.summary {
            writeln!(f, "- **Summary**: {summary}")?;
        }
        if let Some(request) = &self.human_clarification_request {
            writeln!(f, "- **Clarification needed**: {request}")?;
        }
        writeln!(f, "- **Created**: {}", LocalDateTime(&self.created_at))?;
        writeln!(f)?;

        Ok(())
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "### {}. {} ({})",
            self.order + 1,
            self.action,
            self.status.with_icon()
        )?;
        writeln!(f)?;
        writeln!(f, "- **Agent**: {}", self.agent)?;
        writeln!(f, "- **Approval**: {}", self.human_approval_status)?;
        writeln!(f, "- **ID**: {}", self.id)?;

        if let Some(feedback) = &self.human_feedback {
            writeln!(f)?;
            writeln!(f, "#### Feedback")?;
            writeln!(f)?;
            writeln!(f, "{feedback}")?;
        }
        writeln!(f)?;

        Ok(())
    }
}

impl fmt::Display for AgentMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "- **{}** ({}): {}",
            self.source,
            LocalDateTime(&self.created_at),
            self.content
        )
    }
}
