//! Durable storage for plans, steps and session messages.
//!
//! The planner and the execution loop only ever talk to [`PlanStore`]. Two
//! implementations ship with the crate:
//!
//! - [`SqliteStore`]: the durable default, backed by [`crate::db::Database`]
//! - [`MemoryStore`]: a process-local store for tests and embedding
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use tessera_core::store::{PlanStore, StoreBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = StoreBuilder::new()
//!     .with_database_path(Some("/tmp/tessera.db"))
//!     .build()
//!     .await?;
//!
//! for plan in store.get_all_plans().await? {
//!     println!("{} ({})", plan.initial_goal, plan.overall_status);
//! }
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::Result,
    models::{AgentMessage, Plan, Step},
};

pub mod builder;
pub mod memory;
pub mod sqlite;


pub use builder::StoreBuilder;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Per-session CRUD over plans, steps and the message log.
///
/// No implementation holds a lock across two calls; every method is one
/// independent store operation.
#[async_trait]
pub trait PlanStore: Send + Sync {
    /// Persists a new plan.
    async fn add_plan(&self, plan: &Plan) -> Result<()>;

    /// Persists a new step. The owning plan must already exist.
    async fn add_step(&self, step: &Step) -> Result<()>;

    /// Persists a plan together with its steps. Either all records become
    /// visible or none do.
    async fn add_plan_with_steps(&self, plan: &Plan, steps: &[Step]) -> Result<()>;

    /// Appends a message to its session's log.
    async fn add_message(&self, message: &AgentMessage) -> Result<()>;

    /// Looks up a plan by ID.
    async fn get_plan(&self, id: Uuid) -> Result<Option<Plan>>;

    /// Every plan in the store, in creation order.
    async fn get_all_plans(&self) -> Result<Vec<Plan>>;

    /// Plans of one session, in creation order.
    async fn get_plans_by_session(&self, session_id: &str) -> Result<Vec<Plan>>;

    /// Steps of a plan, in plan order.
    async fn get_steps_by_plan(&self, plan_id: Uuid) -> Result<Vec<Step>>;

    /// Looks up a step by ID.
    async fn get_step(&self, id: Uuid) -> Result<Option<Step>>;

    /// Overwrites an existing step.
    async fn update_step(&self, step: &Step) -> Result<()>;

    /// A session's messages in the order they were written.
    async fn get_messages_by_session(&self, session_id: &str) -> Result<Vec<AgentMessage>>;
}
