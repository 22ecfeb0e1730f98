//! Session message log queries.

use rusqlite::params;

use super::utils::{parse_column, parse_optional_column};
use crate::{
    error::{DatabaseResultExt, Result},
    models::AgentMessage,
};

const INSERT_MESSAGE_SQL: &str = "INSERT INTO messages (id, session_id, user_id, plan_id, step_id, source, content, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";
const SELECT_MESSAGES_BY_SESSION_SQL: &str = "SELECT id, session_id, user_id, plan_id, step_id, source, content, created_at FROM messages WHERE session_id = ?1 ORDER BY rowid";

impl super::Database {
    /// Appends a message to its session's log.
    pub fn add_message(&mut self, message: &AgentMessage) -> Result<()> {
        self.connection
            .execute(
                INSERT_MESSAGE_SQL,
                params![
                    message.id.to_string(),
                    message.session_id,
                    message.user_id,
                    message.plan_id.to_string(),
                    message.step_id.map(|id| id.to_string()),
                    message.source,
                    message.content,
                    message.created_at.to_string(),
                ],
            )
            .db_context("Failed to insert message")?;
        Ok(())
    }

    /// Lists a session's messages in the order they were written.
    pub fn get_messages(&self, session_id: &str) -> Result<Vec<AgentMessage>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_MESSAGES_BY_SESSION_SQL)
            .db_context("Failed to prepare query")?;

        let messages = stmt
            .query_map(params![session_id], |row| {
                Ok(AgentMessage {
                    id: parse_column(row, 0)?,
                    session_id: row.get(1)?,
                    user_id: row.get(2)?,
                    plan_id: parse_column(row, 3)?,
                    step_id: parse_optional_column(row, 4)?,
                    source: row.get(5)?,
                    content: row.get(6)?,
                    created_at: parse_column(row, 7)?,
                })
            })
            .db_context("Failed to query messages")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch messages")?;
        Ok(messages)
    }
}
