//! Collection wrapper types for displaying groups of domain objects.

use std::{fmt, ops::Deref};

use crate::models::{AgentMessage, Plan, Step, StepStatus};

/// Newtype wrapper for displaying a list of plans.
///
/// # Examples
///
/// ```rust
/// use tessera_core::{display::Plans, models::Plan};
///
/// let plans = Plans(vec![Plan::in_progress("s-1", "u-1", "Analyze AAPL", "Two steps.", None)]);
/// assert!(plans.to_string().contains("## Analyze AAPL"));
/// assert_eq!(Plans(vec![]).to_string(), "No plans found.\n");
/// ```
pub struct Plans(pub Vec<Plan>);

impl Deref for Plans {
    type Target = [Plan];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Plans {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No plans found.");
        }
        for plan in &self.0 {
            write!(f, "{plan}")?;
        }
        Ok(())
    }
}

/// Newtype wrapper for displaying the steps of a plan.
pub struct Steps(pub Vec<Step>);

impl Deref for Steps {
    type Target = [Step];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Steps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No steps found.");
        }
        for step in &self.0 {
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

/// Newtype wrapper for a session's message log.
pub struct Messages(pub Vec<AgentMessage>);

impl Deref for Messages {
    type Target = [AgentMessage];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Messages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No messages found.");
        }
        for message in &self.0 {
            write!(f, "{message}")?;
        }
        Ok(())
    }
}

/// A plan together with its steps, shown in full.
pub struct PlanDetails<'a> {
    pub plan: &'a Plan,
    pub steps: &'a [Step],
}

impl<'a> PlanDetails<'a> {
    pub fn new(plan: &'a Plan, steps: &'a [Step]) -> Self {
        Self { plan, steps }
    }
}

impl fmt::Display for PlanDetails<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let completed = self
            .steps
            .iter()
            .filter(|s| s.status == StepStatus::Completed)
            .count();

        writeln!(f, "# {}", self.plan.initial_goal)?;
        writeln!(f)?;
        writeln!(f, "- **ID**: {}", self.plan.id)?;
        writeln!(f, "- **Status**: {}", self.plan.overall_status)?;
        writeln!(f, "- **Session**: {}", self.plan.session_id)?;
        writeln!(f, "- **User**: {}", self.plan.user_id)?;
        if !self.steps.is_empty() {
            writeln!(f, "- **Progress**: {completed}/{}", self.steps.len())?;
        }

        if let Some(summary) = &self.plan.summary {
            writeln!(f)?;
            writeln!(f, "{summary}")?;
        }

        if let Some(request) = &self.plan.human_clarification_request {
            writeln!(f)?;
            writeln!(f, "> **Clarification needed**: {request}")?;
        }

        if self.steps.is_empty() {
            writeln!(f, "\nNo steps in this plan.")?;
        } else {
            writeln!(f, "\n## Steps")?;
            writeln!(f)?;
            for step in self.steps {
                write!(f, "{step}")?;
            }
        }

        Ok(())
    }
}
