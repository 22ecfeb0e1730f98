//! Session message log records.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A human-readable notification appended to a session's message log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentMessage {
    /// Unique identifier for the message
    pub id: Uuid,

    /// Session the message belongs to
    pub session_id: String,

    /// User the message is addressed to
    pub user_id: String,

    /// Plan the message refers to
    pub plan_id: Uuid,

    /// Step the message refers to, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_id: Option<Uuid>,

    /// Agent that wrote the message
    pub source: String,

    /// Message body
    pub content: String,

    /// Timestamp when the message was written (UTC)
    pub created_at: Timestamp,
}

impl AgentMessage {
    /// Creates a message about `plan_id` in the given session.
    pub fn new(
        session_id: &str,
        user_id: &str,
        plan_id: Uuid,
        source: &str,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id: session_id.to_string(),
            user_id: user_id.to_string(),
            plan_id,
            step_id: None,
            source: source.to_string(),
            content: content.into(),
            created_at: Timestamp::now(),
        }
    }

    /// Attaches the step the message refers to.
    pub fn with_step(mut self, step_id: Uuid) -> Self {
        self.step_id = Some(step_id);
        self
    }
}
