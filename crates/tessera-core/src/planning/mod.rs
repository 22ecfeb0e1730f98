//! Objective-to-plan decomposition.
//!
//! ```text
//! objective ──▶ prompt ──▶ CompletionService ──▶ parse/validate ──▶ PlanStore
//!                                                     │
//!                                   any failure ──▶ failed Plan (no steps)
//! ```
//!
//! - [`prompt`]: the instruction sent to the model
//! - [`parse`]: fence stripping and schema validation of the reply
//! - [`generator`]: the [`PlanGenerator`] that ties them to the store
//! - [`announcer`]: session notifications about the result
//!
//! [`PlannerAgent`] runs generation followed by announcement for one input
//! task.

use std::sync::Arc;

use crate::{
    config::PlannerConfig,
    error::Result,
    llm::CompletionService,
    store::PlanStore,
};

pub mod announcer;
pub mod generator;
pub mod parse;
pub mod prompt;

pub use announcer::PlanAnnouncer;
pub use generator::{GeneratedPlan, PlanGenerator};
pub use parse::{normalize_response, parse_plan_response, PlanParseError, PlannedStep, StructuredPlan};

/// An objective submitted by a user within a session.
#[derive(Debug, Clone, PartialEq)]
pub struct InputTask {
    pub session_id: String,
    pub user_id: String,
    pub description: String,
}

/// Handles input tasks: generates a plan, then announces it.
pub struct PlannerAgent {
    generator: PlanGenerator,
    announcer: PlanAnnouncer,
}

impl PlannerAgent {
    pub fn new(
        completion: Arc<dyn CompletionService>,
        store: Arc<dyn PlanStore>,
        config: PlannerConfig,
    ) -> Self {
        Self {
            generator: PlanGenerator::new(completion, Arc::clone(&store), config),
            announcer: PlanAnnouncer::new(store),
        }
    }

    /// Generates and announces a plan for `task`.
    ///
    /// Generation failures surface as a failed plan, not an error; only a
    /// failure to write the announcement is returned as `Err`.
    pub async fn handle_input_task(&self, task: &InputTask) -> Result<GeneratedPlan> {
        let generated = self
            .generator
            .generate(&task.description, &task.session_id, &task.user_id)
            .await;
        self.announcer
            .announce(&generated.plan, generated.steps.len())
            .await?;
        Ok(generated)
    }
}
