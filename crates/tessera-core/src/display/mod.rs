//! Markdown formatting for plans, steps and session messages.
//!
//! Domain models implement `Display` directly (see [`models`]); newtype
//! wrappers cover collections and operation outcomes. Everything renders to
//! markdown, which the CLI passes through its terminal renderer.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │ Collections &   │    │    Markdown     │
//! │ (Plan, Step,    │───▶│ Result Wrappers │───▶│     Output      │
//! │  AgentMessage)  │    │                 │    │                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! - [`collections`]: [`Plans`], [`Steps`], [`Messages`] and [`PlanDetails`]
//! - [`results`]: [`UpdateResult`]
//! - [`status`]: [`OperationStatus`]
//! - [`datetime`]: [`LocalDateTime`]
//!
//! ```rust
//! use tessera_core::display::OperationStatus;
//!
//! let done = OperationStatus::success("Approved step".to_string());
//! assert_eq!(done.to_string(), "Success: Approved step\n");
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

pub use collections::{Messages, PlanDetails, Plans, Steps};
pub use datetime::LocalDateTime;
pub use results::UpdateResult;
pub use status::OperationStatus;
