//! Process-local [`PlanStore`].

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use uuid::Uuid;

use super::PlanStore;
use crate::{
    error::{Result, TesseraError},
    models::{AgentMessage, Plan, Step},
};

#[derive(Debug, Default)]
struct Records {
    plans: Vec<Plan>,
    steps: Vec<Step>,
    messages: Vec<AgentMessage>,
}

/// In-memory store. Records live for the lifetime of the value; insertion
/// order is enumeration order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Records>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> MutexGuard<'_, Records> {
        // A panic while holding the lock cannot leave a half-written record.
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Records {
    fn has_plan(&self, id: Uuid) -> bool {
        self.plans.iter().any(|p| p.id == id)
    }

    fn check_new_step(&self, step: &Step) -> Result<()> {
        if self.steps.iter().any(|s| s.id == step.id) {
            return Err(TesseraError::invalid_input("id")
                .with_reason(format!("step {} already exists", step.id)));
        }
        if self
            .steps
            .iter()
            .any(|s| s.plan_id == step.plan_id && s.order == step.order)
        {
            return Err(TesseraError::invalid_input("order").with_reason(format!(
                "plan {} already has a step at position {}",
                step.plan_id, step.order
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl PlanStore for MemoryStore {
    async fn add_plan(&self, plan: &Plan) -> Result<()> {
        let mut records = self.records();
        if records.has_plan(plan.id) {
            return Err(TesseraError::invalid_input("id")
                .with_reason(format!("plan {} already exists", plan.id)));
        }
        records.plans.push(plan.clone());
        Ok(())
    }

    async fn add_step(&self, step: &Step) -> Result<()> {
        let mut records = self.records();
        if !records.has_plan(step.plan_id) {
            return Err(TesseraError::PlanNotFound { id: step.plan_id });
        }
        records.check_new_step(step)?;
        records.steps.push(step.clone());
        Ok(())
    }

    async fn add_plan_with_steps(&self, plan: &Plan, steps: &[Step]) -> Result<()> {
        let mut records = self.records();
        if records.has_plan(plan.id) {
            return Err(TesseraError::invalid_input("id")
                .with_reason(format!("plan {} already exists", plan.id)));
        }
        for (i, step) in steps.iter().enumerate() {
            if step.plan_id != plan.id {
                return Err(TesseraError::invalid_input("plan_id")
                    .with_reason(format!("step {} does not belong to plan {}", step.id, plan.id)));
            }
            records.check_new_step(step)?;
            if steps[..i].iter().any(|s| s.id == step.id || s.order == step.order) {
                return Err(TesseraError::invalid_input("steps")
                    .with_reason(format!("duplicate step {} in batch", step.id)));
            }
        }
        records.plans.push(plan.clone());
        records.steps.extend_from_slice(steps);
        Ok(())
    }

    async fn add_message(&self, message: &AgentMessage) -> Result<()> {
        self.records().messages.push(message.clone());
        Ok(())
    }

    async fn get_plan(&self, id: Uuid) -> Result<Option<Plan>> {
        Ok(self.records().plans.iter().find(|p| p.id == id).cloned())
    }

    async fn get_all_plans(&self) -> Result<Vec<Plan>> {
        Ok(self.records().plans.clone())
    }

    async fn get_plans_by_session(&self, session_id: &str) -> Result<Vec<Plan>> {
        Ok(self
            .records()
            .plans
            .iter()
            .filter(|p| p.session_id == session_id)
            .cloned()
            .collect())
    }

    async fn get_steps_by_plan(&self, plan_id: Uuid) -> Result<Vec<Step>> {
        let mut steps: Vec<Step> = self
            .records()
            .steps
            .iter()
            .filter(|s| s.plan_id == plan_id)
            .cloned()
            .collect();
        steps.sort_by_key(|s| s.order);
        Ok(steps)
    }

    async fn get_step(&self, id: Uuid) -> Result<Option<Step>> {
        Ok(self.records().steps.iter().find(|s| s.id == id).cloned())
    }

    async fn update_step(&self, step: &Step) -> Result<()> {
        let mut records = self.records();
        let slot = records
            .steps
            .iter_mut()
            .find(|s| s.id == step.id)
            .ok_or(TesseraError::StepNotFound { id: step.id })?;
        *slot = step.clone();
        if let Some(plan) = records.plans.iter_mut().find(|p| p.id == step.plan_id) {
            plan.updated_at = step.updated_at;
        }
        Ok(())
    }

    async fn get_messages_by_session(&self, session_id: &str) -> Result<Vec<AgentMessage>> {
        Ok(self
            .records()
            .messages
            .iter()
            .filter(|m| m.session_id == session_id)
            .cloned()
            .collect())
    }
}
