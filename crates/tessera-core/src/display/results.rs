//! Result wrapper types for displaying operation outcomes.

use std::fmt;

use crate::models::Step;

/// Wrapper type for displaying the result of an update, together with a
/// list of what changed.
///
/// # Examples
///
/// ```rust
/// use tessera_core::{
///     display::UpdateResult,
///     models::{AgentType, Plan, Step},
/// };
///
/// let plan = Plan::in_progress("s-1", "u-1", "Analyze AAPL", "One step.", None);
/// let mut step = Step::planned(&plan, 0, "Pull the transcript", AgentType::EarningCallsAnalystAgent);
/// step.record_feedback(true, None);
///
/// let result = UpdateResult::with_changes(step, vec!["Approval: approved".to_string()]);
/// assert!(result.to_string().contains("Changes made:"));
/// ```
pub struct UpdateResult<T> {
    pub resource: T,
    pub changes: Vec<String>,
}

impl<T> UpdateResult<T> {
    pub fn new(resource: T) -> Self {
        Self {
            resource,
            changes: Vec::new(),
        }
    }

    /// Create an UpdateResult with a list of changes made.
    pub fn with_changes(resource: T, changes: Vec<String>) -> Self {
        Self { resource, changes }
    }
}

impl fmt::Display for UpdateResult<Step> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Updated step with ID: {}", self.resource.id)?;

        if !self.changes.is_empty() {
            writeln!(f)?;
            writeln!(f, "Changes made:")?;
            for change in &self.changes {
                writeln!(f, "- {change}")?;
            }
        }

        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}
