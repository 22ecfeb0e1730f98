//! Core library for the Tessera planning agent.
//!
//! Tessera turns a natural-language objective into an ordered plan of steps,
//! each owned by one specialist agent, and later carries out the steps a
//! human has approved.
//!
//! - [`planning`]: prompt construction, model response validation, and the
//!   [`PlanGenerator`] / [`PlannerAgent`] pair
//! - [`executor`]: the background [`ExecutionLoop`] that dispatches approved
//!   steps
//! - [`dispatch`]: the [`Dispatcher`] seam and an in-process
//!   [`AgentRegistry`]
//! - [`store`]: the [`PlanStore`] trait with SQLite and in-memory
//!   implementations
//! - [`llm`]: the [`CompletionService`] trait and an OpenAI-compatible client
//! - [`display`]: markdown `Display` for everything the CLI prints
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use tessera_core::{
//!     CompletionConfig, InputTask, OpenAiClient, PlannerAgent, PlannerConfig, StoreBuilder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(StoreBuilder::new().build().await?);
//! let completion = Arc::new(OpenAiClient::from_config(&CompletionConfig::from_env()?)?);
//! let planner = PlannerAgent::new(completion, store, PlannerConfig::default());
//!
//! let generated = planner
//!     .handle_input_task(&InputTask {
//!         session_id: "default".to_string(),
//!         user_id: "default-user".to_string(),
//!         description: "Summarize the latest AAPL earnings call".to_string(),
//!     })
//!     .await?;
//! println!("{}", generated.plan);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod db;
pub mod dispatch;
pub mod display;
pub mod error;
pub mod executor;
pub mod llm;
pub mod models;
pub mod planning;
pub mod store;

pub use config::{CompletionConfig, LoopConfig, PlannerConfig, ToolSpec};
pub use dispatch::{AgentHandler, AgentRegistry, Dispatcher, LoggingAgent};
pub use error::{Result, TesseraError};
pub use executor::{ExecutionLoop, SweepReport};
pub use llm::{ChatMessage, CompletionError, CompletionParams, CompletionService, OpenAiClient};
pub use models::{
    AgentMessage, AgentType, HumanFeedbackStatus, Plan, PlanStatus, Step, StepStatus,
};
pub use planning::{GeneratedPlan, InputTask, PlanGenerator, PlannerAgent};
pub use store::{MemoryStore, PlanStore, SqliteStore, StoreBuilder};
