//! SQLite-backed [`PlanStore`].

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::task;
use uuid::Uuid;

use super::PlanStore;
use crate::{
    db::Database,
    error::{join_error, Result},
    models::{AgentMessage, Plan, Step},
};

/// Durable store that opens a short-lived connection per operation on the
/// blocking thread pool.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: PathBuf,
}

impl SqliteStore {
    /// Creates a store over an already initialized database file.
    pub(crate) fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    /// Path of the backing database file.
    pub fn database_path(&self) -> &Path {
        &self.db_path
    }

    /// Runs `op` against a fresh connection without blocking the runtime.
    async fn with_db<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            op(&mut db)
        })
        .await
        .map_err(join_error)?
    }
}

#[async_trait]
impl PlanStore for SqliteStore {
    async fn add_plan(&self, plan: &Plan) -> Result<()> {
        let plan = plan.clone();
        self.with_db(move |db| db.add_plan(&plan)).await
    }

    async fn add_step(&self, step: &Step) -> Result<()> {
        let step = step.clone();
        self.with_db(move |db| db.add_step(&step)).await
    }

    async fn add_plan_with_steps(&self, plan: &Plan, steps: &[Step]) -> Result<()> {
        let plan = plan.clone();
        let steps = steps.to_vec();
        self.with_db(move |db| db.add_plan_with_steps(&plan, &steps))
            .await
    }

    async fn add_message(&self, message: &AgentMessage) -> Result<()> {
        let message = message.clone();
        self.with_db(move |db| db.add_message(&message)).await
    }

    async fn get_plan(&self, id: Uuid) -> Result<Option<Plan>> {
        self.with_db(move |db| db.get_plan(id)).await
    }

    async fn get_all_plans(&self) -> Result<Vec<Plan>> {
        self.with_db(|db| db.list_plans()).await
    }

    async fn get_plans_by_session(&self, session_id: &str) -> Result<Vec<Plan>> {
        let session_id = session_id.to_string();
        self.with_db(move |db| db.list_plans_by_session(&session_id))
            .await
    }

    async fn get_steps_by_plan(&self, plan_id: Uuid) -> Result<Vec<Step>> {
        self.with_db(move |db| db.get_steps(plan_id)).await
    }

    async fn get_step(&self, id: Uuid) -> Result<Option<Step>> {
        self.with_db(move |db| db.get_step(id)).await
    }

    async fn update_step(&self, step: &Step) -> Result<()> {
        let step = step.clone();
        self.with_db(move |db| db.update_step(&step)).await
    }

    async fn get_messages_by_session(&self, session_id: &str) -> Result<Vec<AgentMessage>> {
        let session_id = session_id.to_string();
        self.with_db(move |db| db.get_messages(&session_id)).await
    }
}
