//! Plan CRUD operations and queries.

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::utils::parse_column;
use crate::{
    error::{DatabaseResultExt, Result, TesseraError},
    models::{Plan, Step},
};

const INSERT_PLAN_SQL: &str = "INSERT INTO plans (id, session_id, user_id, initial_goal, overall_status, source, summary, human_clarification_request, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";
const PLAN_COLUMNS: &str = "id, session_id, user_id, initial_goal, overall_status, source, summary, human_clarification_request, created_at, updated_at";

impl super::Database {
    /// Helper function to construct a Plan from a database row
    fn build_plan_from_row(row: &rusqlite::Row) -> rusqlite::Result<Plan> {
        Ok(Plan {
            id: parse_column(row, 0)?,
            session_id: row.get(1)?,
            user_id: row.get(2)?,
            initial_goal: row.get(3)?,
            overall_status: parse_column(row, 4)?,
            source: row.get(5)?,
            summary: row.get(6)?,
            human_clarification_request: row.get(7)?,
            created_at: parse_column(row, 8)?,
            updated_at: parse_column(row, 9)?,
        })
    }

    /// Writes a single plan row on the given connection or transaction.
    pub(super) fn insert_plan_row(conn: &Connection, plan: &Plan) -> Result<()> {
        conn.execute(
            INSERT_PLAN_SQL,
            params![
                plan.id.to_string(),
                plan.session_id,
                plan.user_id,
                plan.initial_goal,
                plan.overall_status.as_str(),
                plan.source,
                plan.summary,
                plan.human_clarification_request,
                plan.created_at.to_string(),
                plan.updated_at.to_string(),
            ],
        )
        .db_context("Failed to insert plan")?;
        Ok(())
    }

    /// Inserts a plan with no steps.
    pub fn add_plan(&mut self, plan: &Plan) -> Result<()> {
        Self::insert_plan_row(&self.connection, plan)
    }

    /// Inserts a plan and all of its steps in one transaction. Either every
    /// row is written or none is.
    pub fn add_plan_with_steps(&mut self, plan: &Plan, steps: &[Step]) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        Self::insert_plan_row(&tx, plan)?;
        for step in steps {
            if step.plan_id != plan.id {
                return Err(TesseraError::invalid_input("plan_id")
                    .with_reason(format!("step {} does not belong to plan {}", step.id, plan.id)));
            }
            Self::insert_step_row(&tx, step)?;
        }

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(())
    }

    /// Retrieves a plan by its ID.
    pub fn get_plan(&self, id: Uuid) -> Result<Option<Plan>> {
        let sql = format!("SELECT {PLAN_COLUMNS} FROM plans WHERE id = ?1");
        self.connection
            .query_row(&sql, params![id.to_string()], Self::build_plan_from_row)
            .optional()
            .db_context("Failed to query plan")
    }

    /// Lists every plan in creation order.
    pub fn list_plans(&self) -> Result<Vec<Plan>> {
        let sql = format!("SELECT {PLAN_COLUMNS} FROM plans ORDER BY rowid");
        let mut stmt = self
            .connection
            .prepare(&sql)
            .db_context("Failed to prepare query")?;

        let plans = stmt
            .query_map([], Self::build_plan_from_row)
            .db_context("Failed to query plans")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch plans")?;
        Ok(plans)
    }

    /// Lists the plans of one session in creation order.
    pub fn list_plans_by_session(&self, session_id: &str) -> Result<Vec<Plan>> {
        let sql = format!(
            "SELECT {PLAN_COLUMNS} FROM plans WHERE session_id = ?1 ORDER BY rowid"
        );
        let mut stmt = self
            .connection
            .prepare(&sql)
            .db_context("Failed to prepare query")?;

        let plans = stmt
            .query_map(params![session_id], Self::build_plan_from_row)
            .db_context("Failed to query plans")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch plans")?;
        Ok(plans)
    }
}
