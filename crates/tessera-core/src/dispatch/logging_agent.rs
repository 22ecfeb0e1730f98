//! Stand-in agent that only records receipt of a step.

use std::sync::Arc;

use async_trait::async_trait;
use log::info;

use super::AgentHandler;
use crate::{
    error::Result,
    models::{AgentMessage, AgentType, Step},
    store::PlanStore,
};

/// Acknowledges each step in the session message log without doing any
/// domain work.
pub struct LoggingAgent {
    agent: AgentType,
    store: Arc<dyn PlanStore>,
}

impl LoggingAgent {
    pub fn new(agent: AgentType, store: Arc<dyn PlanStore>) -> Self {
        Self { agent, store }
    }
}

#[async_trait]
impl AgentHandler for LoggingAgent {
    async fn handle(&self, session_id: &str, step: &Step) -> Result<()> {
        info!("{} received step {}: {}", self.agent, step.id, step.action);
        let message = AgentMessage::new(
            session_id,
            &step.user_id,
            step.plan_id,
            self.agent.as_str(),
            format!("{} received step: {}", self.agent, step.action),
        )
        .with_step(step.id);
        self.store.add_message(&message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::Plan, store::MemoryStore};

    #[tokio::test]
    async fn test_logging_agent_writes_session_message() {
        let store = Arc::new(MemoryStore::new());
        let plan = Plan::in_progress("s-1", "u-1", "goal", "summary", None);
        let step = Step::planned(&plan, 0, "Chart the 50-day average", AgentType::TechnicalAnalysisAgent);

        let agent = LoggingAgent::new(AgentType::TechnicalAnalysisAgent, store.clone());
        agent.handle("s-1", &step).await.unwrap();

        let messages = store.get_messages_by_session("s-1").await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].source, "TechnicalAnalysisAgent");
        assert_eq!(messages[0].step_id, Some(step.id));
        assert_eq!(
            messages[0].content,
            "TechnicalAnalysisAgent received step: Chart the 50-day average"
        );
    }
}
