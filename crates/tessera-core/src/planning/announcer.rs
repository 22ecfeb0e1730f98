//! Session notifications about freshly generated plans.

use std::sync::Arc;

use crate::{
    error::Result,
    models::{AgentMessage, Plan, PLANNER_SOURCE},
    store::PlanStore,
};

/// Writes human-readable plan notifications to the session message log.
pub struct PlanAnnouncer {
    store: Arc<dyn PlanStore>,
}

impl PlanAnnouncer {
    pub fn new(store: Arc<dyn PlanStore>) -> Self {
        Self { store }
    }

    /// Announces the step count and, if present, echoes the plan's
    /// clarification request. Store errors propagate; nothing is retried.
    pub async fn announce(&self, plan: &Plan, step_count: usize) -> Result<()> {
        let summary = AgentMessage::new(
            &plan.session_id,
            &plan.user_id,
            plan.id,
            PLANNER_SOURCE,
            format!("Generated a plan with {step_count} steps."),
        );
        self.store.add_message(&summary).await?;

        if let Some(request) = &plan.human_clarification_request {
            let clarification = AgentMessage::new(
                &plan.session_id,
                &plan.user_id,
                plan.id,
                PLANNER_SOURCE,
                format!("I require additional info: {request}"),
            );
            self.store.add_message(&clarification).await?;
        }

        Ok(())
    }
}
