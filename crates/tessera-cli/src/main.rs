//! Tessera CLI
//!
//! Command-line interface for generating agent plans, approving their steps
//! and running the execution loop.

mod args;
mod cli;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands, ListPlansArgs, PlanCommands};
use clap::Parser;
use cli::Cli;
use log::info;
use renderer::TerminalRenderer;
use tessera_core::StoreBuilder;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        session,
        user,
        command,
    } = Args::parse();

    let store = StoreBuilder::new()
        .with_database_path(database_file)
        .build()
        .await
        .context("Failed to initialize store")?;

    info!("Tessera started (session {session})");

    let cli = Cli::new(store, TerminalRenderer::new(!no_color), session, user);

    match command {
        Some(Commands::Plan { command }) => cli.handle_plan_command(command).await,
        Some(Commands::Step { command }) => cli.handle_step_command(command).await,
        Some(Commands::Messages) => cli.show_messages().await,
        Some(Commands::Run(args)) => cli.run(args).await,
        None => {
            cli.handle_plan_command(PlanCommands::List(ListPlansArgs { all: false }))
                .await
        }
    }
}
