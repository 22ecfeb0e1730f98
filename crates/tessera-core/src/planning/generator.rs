//! Structured plan generation.

use std::sync::Arc;

use log::{debug, error, info};
use thiserror::Error;
use tokio::time;

use super::{
    parse::{parse_plan_response, PlanParseError, StructuredPlan},
    prompt::build_instruction,
};
use crate::{
    config::PlannerConfig,
    error::TesseraError,
    llm::{ChatMessage, CompletionError, CompletionParams, CompletionService},
    models::{Plan, Step},
    store::PlanStore,
};

/// A generated plan together with the steps persisted for it.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPlan {
    pub plan: Plan,
    pub steps: Vec<Step>,
}

/// Everything that can turn a generation into a failed plan.
#[derive(Debug, Error)]
enum GenerationError {
    #[error("completion failed: {0}")]
    Completion(#[from] CompletionError),
    #[error(transparent)]
    Parse(#[from] PlanParseError),
    #[error("could not persist plan: {0}")]
    Store(#[from] TesseraError),
}

/// Turns objectives into persisted plans by way of the completion service.
pub struct PlanGenerator {
    completion: Arc<dyn CompletionService>,
    store: Arc<dyn PlanStore>,
    config: PlannerConfig,
}

impl PlanGenerator {
    pub fn new(
        completion: Arc<dyn CompletionService>,
        store: Arc<dyn PlanStore>,
        config: PlannerConfig,
    ) -> Self {
        Self {
            completion,
            store,
            config,
        }
    }

    /// Generates and persists a plan for `objective`.
    ///
    /// This never fails. When the model call, the response, or the store
    /// write goes wrong, the cause is logged and a failed plan with no steps
    /// is persisted (best effort) and returned instead.
    pub async fn generate(&self, objective: &str, session_id: &str, user_id: &str) -> GeneratedPlan {
        match self.try_generate(objective, session_id, user_id).await {
            Ok(generated) => {
                info!(
                    "Created plan {} with {} steps for session {session_id}",
                    generated.plan.id,
                    generated.steps.len()
                );
                generated
            }
            Err(e) => {
                error!("Failed to generate structured plan: {e}");
                self.record_failure(session_id, user_id).await
            }
        }
    }

    async fn try_generate(
        &self,
        objective: &str,
        session_id: &str,
        user_id: &str,
    ) -> Result<GeneratedPlan, GenerationError> {
        let structured = self.request_plan(objective).await?;

        let plan = Plan::in_progress(
            session_id,
            user_id,
            structured.initial_goal,
            structured.summary,
            structured.human_clarification_request,
        );
        let steps: Vec<Step> = structured
            .steps
            .into_iter()
            .zip(0u32..)
            .map(|(planned, order)| Step::planned(&plan, order, planned.action, planned.agent))
            .collect();

        self.store.add_plan_with_steps(&plan, &steps).await?;

        Ok(GeneratedPlan { plan, steps })
    }

    /// Asks the model for a plan and validates the answer.
    async fn request_plan(&self, objective: &str) -> Result<StructuredPlan, GenerationError> {
        let instruction =
            build_instruction(objective, &self.config.available_agents, &self.config.tools);
        let messages = [ChatMessage::user(instruction)];
        let params = CompletionParams::with_temperature(self.config.temperature);

        let timeout = self.config.completion_timeout;
        let content = time::timeout(timeout, self.completion.complete(&messages, &params))
            .await
            .map_err(|_| CompletionError::Timeout(timeout))??;

        debug!("Planner response:\n{content}");

        Ok(parse_plan_response(&content, &self.config.available_agents)?)
    }

    async fn record_failure(&self, session_id: &str, user_id: &str) -> GeneratedPlan {
        let plan = Plan::failed(session_id, user_id);
        if let Err(e) = self.store.add_plan(&plan).await {
            error!("Failed to persist failed plan {}: {e}", plan.id);
        }
        GeneratedPlan {
            plan,
            steps: Vec::new(),
        }
    }
}
