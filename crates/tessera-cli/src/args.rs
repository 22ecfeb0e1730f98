//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use uuid::Uuid;

/// Turn objectives into agent plans and carry out the steps you approve.
///
/// `plan generate` asks the configured model for a plan; every step starts
/// out awaiting approval. `step approve` releases a step, and `run` starts
/// the loop that dispatches approved steps to their agents.
#[derive(Parser)]
#[command(version, about, name = "tessera")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/tessera/tessera.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Session that new plans and messages belong to
    #[arg(long, global = true, default_value = "default")]
    pub session: String,

    /// User on whose behalf plans are generated
    #[arg(long, global = true, default_value = "default-user")]
    pub user: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate and inspect plans
    #[command(alias = "p")]
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Review and approve individual steps
    #[command(alias = "s")]
    Step {
        #[command(subcommand)]
        command: StepCommands,
    },
    /// Show the session's message log
    #[command(alias = "m")]
    Messages,
    /// Dispatch approved steps until interrupted
    Run(RunArgs),
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Ask the model to decompose an objective into a plan
    #[command(alias = "g")]
    Generate(GeneratePlanArgs),
    /// List plans of the current session
    #[command(aliases = ["l", "ls"])]
    List(ListPlansArgs),
    /// Show a plan and its steps
    #[command(alias = "s")]
    Show(IdArgs),
}

#[derive(Subcommand)]
pub enum StepCommands {
    /// Show details of a step
    #[command(alias = "s")]
    Show(IdArgs),
    /// Approve a step for execution
    #[command(alias = "a")]
    Approve(FeedbackArgs),
    /// Reject a step so it never runs
    #[command(alias = "r")]
    Reject(FeedbackArgs),
}

#[derive(ClapArgs)]
pub struct GeneratePlanArgs {
    /// What the plan should accomplish
    pub objective: String,

    /// JSON file listing the tools agents may call, as names or
    /// `{"name": ..., "description": ...}` records
    #[arg(long)]
    pub tools_file: Option<PathBuf>,
}

#[derive(ClapArgs)]
pub struct ListPlansArgs {
    /// List plans from every session
    #[arg(long)]
    pub all: bool,
}

#[derive(ClapArgs)]
pub struct IdArgs {
    /// Identifier as shown by `plan list` or `plan show`
    pub id: Uuid,
}

#[derive(ClapArgs)]
pub struct FeedbackArgs {
    /// Identifier of the step
    pub id: Uuid,

    /// Note to record with the decision
    #[arg(short, long)]
    pub feedback: Option<String>,
}

#[derive(ClapArgs)]
pub struct RunArgs {
    /// Run a single sweep and exit
    #[arg(long)]
    pub once: bool,

    /// Seconds to wait between sweeps
    #[arg(long, default_value_t = 10)]
    pub poll_interval: u64,

    /// Seconds to wait after a failed sweep
    #[arg(long, default_value_t = 30)]
    pub failure_backoff: u64,
}
