//! Delivery of approved steps to the agents that own them.
//!
//! The execution loop depends only on [`Dispatcher`]. [`AgentRegistry`] is
//! the in-process implementation: it routes a step to the [`AgentHandler`]
//! registered under the lower-cased agent name.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use log::debug;

use crate::{
    error::{Result, TesseraError},
    models::{AgentType, Step},
};

pub mod logging_agent;

pub use logging_agent::LoggingAgent;

/// Sends a step to a named agent within a session and waits for it to
/// finish handling the step.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn send(&self, agent_name: &str, session_id: &str, step: &Step) -> Result<()>;
}

/// Something that carries out steps on behalf of an agent.
#[async_trait]
pub trait AgentHandler: Send + Sync {
    async fn handle(&self, session_id: &str, step: &Step) -> Result<()>;
}

/// Routes steps to handlers keyed by lower-cased agent name.
#[derive(Default)]
pub struct AgentRegistry {
    handlers: HashMap<String, Arc<dyn AgentHandler>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `agent`, replacing any earlier handler.
    pub fn register(&mut self, agent: AgentType, handler: Arc<dyn AgentHandler>) -> &mut Self {
        self.handlers.insert(agent.dispatch_name(), handler);
        self
    }

    /// Registers the same handler for every agent in `agents`.
    pub fn register_all(&mut self, agents: &[AgentType], handler: Arc<dyn AgentHandler>) -> &mut Self {
        for agent in agents {
            self.register(*agent, Arc::clone(&handler));
        }
        self
    }

    /// Whether a handler is registered under `agent_name`.
    pub fn contains(&self, agent_name: &str) -> bool {
        self.handlers.contains_key(&agent_name.to_lowercase())
    }
}

#[async_trait]
impl Dispatcher for AgentRegistry {
    async fn send(&self, agent_name: &str, session_id: &str, step: &Step) -> Result<()> {
        let key = agent_name.to_lowercase();
        let handler = self
            .handlers
            .get(&key)
            .ok_or_else(|| TesseraError::UnknownAgent { name: key.clone() })?;
        debug!("Dispatching step {} to {key} in session {session_id}", step.id);
        handler.handle(session_id, step).await
    }
}
