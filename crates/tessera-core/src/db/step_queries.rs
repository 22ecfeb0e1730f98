//! Step CRUD operations and queries.

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::utils::{order_column, parse_column};
use crate::{
    error::{DatabaseResultExt, Result, TesseraError},
    models::Step,
};

const CHECK_PLAN_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM plans WHERE id = ?1)";
const INSERT_STEP_SQL: &str = "INSERT INTO steps (id, plan_id, session_id, user_id, action, agent, status, human_approval_status, human_feedback, step_order, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)";
const STEP_COLUMNS: &str = "id, plan_id, session_id, user_id, action, agent, status, human_approval_status, human_feedback, step_order, created_at, updated_at";
const UPDATE_STEP_SQL: &str = "UPDATE steps SET action = ?1, agent = ?2, status = ?3, human_approval_status = ?4, human_feedback = ?5, updated_at = ?6 WHERE id = ?7";
const UPDATE_PLAN_TIMESTAMP_SQL: &str = "UPDATE plans SET updated_at = ?1 WHERE id = ?2";

impl super::Database {
    /// Helper function to construct a Step from a database row
    fn build_step_from_row(row: &rusqlite::Row) -> rusqlite::Result<Step> {
        Ok(Step {
            id: parse_column(row, 0)?,
            plan_id: parse_column(row, 1)?,
            session_id: row.get(2)?,
            user_id: row.get(3)?,
            action: row.get(4)?,
            agent: parse_column(row, 5)?,
            status: parse_column(row, 6)?,
            human_approval_status: parse_column(row, 7)?,
            human_feedback: row.get(8)?,
            order: order_column(row, 9)?,
            created_at: parse_column(row, 10)?,
            updated_at: parse_column(row, 11)?,
        })
    }

    /// Writes a single step row on the given connection or transaction.
    pub(super) fn insert_step_row(conn: &Connection, step: &Step) -> Result<()> {
        conn.execute(
            INSERT_STEP_SQL,
            params![
                step.id.to_string(),
                step.plan_id.to_string(),
                step.session_id,
                step.user_id,
                step.action,
                step.agent.as_str(),
                step.status.as_str(),
                step.human_approval_status.as_str(),
                step.human_feedback,
                i64::from(step.order),
                step.created_at.to_string(),
                step.updated_at.to_string(),
            ],
        )
        .db_context("Failed to insert step")?;
        Ok(())
    }

    /// Adds a step to an existing plan.
    pub fn add_step(&mut self, step: &Step) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let plan_exists: bool = tx
            .query_row(
                CHECK_PLAN_EXISTS_SQL,
                params![step.plan_id.to_string()],
                |row| row.get(0),
            )
            .db_context("Failed to check plan existence")?;

        if !plan_exists {
            return Err(TesseraError::PlanNotFound { id: step.plan_id });
        }

        Self::insert_step_row(&tx, step)?;

        tx.execute(
            UPDATE_PLAN_TIMESTAMP_SQL,
            params![step.updated_at.to_string(), step.plan_id.to_string()],
        )
        .db_context("Failed to update plan timestamp")?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(())
    }

    /// Retrieves all steps of a plan in plan order.
    pub fn get_steps(&self, plan_id: Uuid) -> Result<Vec<Step>> {
        let sql = format!("SELECT {STEP_COLUMNS} FROM steps WHERE plan_id = ?1 ORDER BY step_order");
        let mut stmt = self
            .connection
            .prepare(&sql)
            .db_context("Failed to prepare query")?;

        let steps = stmt
            .query_map(params![plan_id.to_string()], Self::build_step_from_row)
            .db_context("Failed to query steps")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch steps")?;
        Ok(steps)
    }

    /// Retrieves a single step by its ID.
    pub fn get_step(&self, id: Uuid) -> Result<Option<Step>> {
        let sql = format!("SELECT {STEP_COLUMNS} FROM steps WHERE id = ?1");
        self.connection
            .query_row(&sql, params![id.to_string()], Self::build_step_from_row)
            .optional()
            .db_context("Failed to query step")
    }

    /// Overwrites the mutable fields of an existing step and bumps the
    /// owning plan's modification time.
    pub fn update_step(&mut self, step: &Step) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let now = step.updated_at.to_string();
        let rows = tx
            .execute(
                UPDATE_STEP_SQL,
                params![
                    step.action,
                    step.agent.as_str(),
                    step.status.as_str(),
                    step.human_approval_status.as_str(),
                    step.human_feedback,
                    &now,
                    step.id.to_string(),
                ],
            )
            .db_context("Failed to update step")?;

        if rows == 0 {
            return Err(TesseraError::StepNotFound { id: step.id });
        }

        tx.execute(UPDATE_PLAN_TIMESTAMP_SQL, params![&now, step.plan_id.to_string()])
            .db_context("Failed to update plan timestamp")?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(())
    }
}
