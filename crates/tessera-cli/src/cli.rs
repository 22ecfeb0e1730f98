//! Command handlers.
//!
//! Each handler talks to the store (and, for generation, the completion
//! service), formats the outcome with the core display types and hands the
//! markdown to the renderer.

use std::{path::Path, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use log::info;
use tessera_core::{
    display::{Messages, OperationStatus, PlanDetails, Plans, UpdateResult},
    AgentRegistry, AgentType, CompletionConfig, ExecutionLoop, InputTask, LoggingAgent,
    LoopConfig, OpenAiClient, PlanStore, PlannerAgent, PlannerConfig, SqliteStore,
    TesseraError, ToolSpec,
};
use tokio::sync::watch;
use uuid::Uuid;

use crate::{
    args::{FeedbackArgs, GeneratePlanArgs, ListPlansArgs, PlanCommands, RunArgs, StepCommands},
    renderer::TerminalRenderer,
};

pub struct Cli {
    store: Arc<SqliteStore>,
    renderer: TerminalRenderer,
    session: String,
    user: String,
}

impl Cli {
    pub fn new(store: SqliteStore, renderer: TerminalRenderer, session: String, user: String) -> Self {
        Self {
            store: Arc::new(store),
            renderer,
            session,
            user,
        }
    }

    pub async fn handle_plan_command(&self, command: PlanCommands) -> Result<()> {
        match command {
            PlanCommands::Generate(args) => self.generate_plan(args).await,
            PlanCommands::List(args) => self.list_plans(args).await,
            PlanCommands::Show(args) => self.show_plan(args.id).await,
        }
    }

    pub async fn handle_step_command(&self, command: StepCommands) -> Result<()> {
        match command {
            StepCommands::Show(args) => self.show_step(args.id).await,
            StepCommands::Approve(args) => self.record_decision(args, true).await,
            StepCommands::Reject(args) => self.record_decision(args, false).await,
        }
    }

    async fn generate_plan(&self, args: GeneratePlanArgs) -> Result<()> {
        let completion_config =
            CompletionConfig::from_env().context("Completion service is not configured")?;
        let completion = OpenAiClient::from_config(&completion_config)
            .context("Failed to create completion client")?;

        let mut config =
            PlannerConfig::default().with_completion_timeout(completion_config.request_timeout);
        if let Some(path) = &args.tools_file {
            config = config.with_tools(load_tools(path)?);
        }

        let planner = PlannerAgent::new(Arc::new(completion), self.store.clone(), config);
        let generated = planner
            .handle_input_task(&InputTask {
                session_id: self.session.clone(),
                user_id: self.user.clone(),
                description: args.objective,
            })
            .await
            .context("Failed to announce plan")?;

        let details = PlanDetails::new(&generated.plan, &generated.steps);
        self.renderer.render(&details.to_string())?;

        if generated.plan.is_failed() {
            anyhow::bail!("Plan generation failed; see the log for the cause");
        }
        Ok(())
    }

    async fn list_plans(&self, args: ListPlansArgs) -> Result<()> {
        let plans = match args.all {
            true => self.store.get_all_plans().await,
            false => self.store.get_plans_by_session(&self.session).await,
        };
        let plans = plans.context("Failed to list plans")?;

        self.renderer.render(&Plans(plans).to_string())
    }

    async fn show_plan(&self, id: Uuid) -> Result<()> {
        let plan = self
            .store
            .get_plan(id)
            .await
            .context("Failed to fetch plan")?
            .ok_or(TesseraError::PlanNotFound { id })?;
        let steps = self
            .store
            .get_steps_by_plan(id)
            .await
            .context("Failed to fetch steps")?;

        self.renderer
            .render(&PlanDetails::new(&plan, &steps).to_string())
    }

    async fn show_step(&self, id: Uuid) -> Result<()> {
        let step = self
            .store
            .get_step(id)
            .await
            .context("Failed to fetch step")?
            .ok_or(TesseraError::StepNotFound { id })?;

        self.renderer.render(&step.to_string())
    }

    async fn record_decision(&self, args: FeedbackArgs, approved: bool) -> Result<()> {
        let mut step = self
            .store
            .get_step(args.id)
            .await
            .context("Failed to fetch step")?
            .ok_or(TesseraError::StepNotFound { id: args.id })?;

        let mut changes = vec![format!(
            "Approval: {} -> {}",
            step.human_approval_status,
            if approved { "approved" } else { "rejected" }
        )];
        if let Some(feedback) = &args.feedback {
            changes.push(format!("Feedback: {feedback}"));
        }

        step.record_feedback(approved, args.feedback)?;
        self.store
            .update_step(&step)
            .await
            .context("Failed to update step")?;

        self.renderer
            .render(&UpdateResult::with_changes(step, changes).to_string())
    }

    pub async fn show_messages(&self) -> Result<()> {
        let messages = self
            .store
            .get_messages_by_session(&self.session)
            .await
            .context("Failed to fetch messages")?;

        self.renderer.render(&Messages(messages).to_string())
    }

    pub async fn run(&self, args: RunArgs) -> Result<()> {
        let store: Arc<dyn PlanStore> = self.store.clone();
        let mut registry = AgentRegistry::new();
        for agent in AgentType::ALL {
            registry.register(agent, Arc::new(LoggingAgent::new(agent, Arc::clone(&store))));
        }

        let config = LoopConfig {
            poll_interval: Duration::from_secs(args.poll_interval),
            failure_backoff: Duration::from_secs(args.failure_backoff),
        };
        let executor = ExecutionLoop::new(store, Arc::new(registry), config);

        if args.once {
            let report = executor.run_sweep().await.context("Sweep failed")?;
            let status = OperationStatus::success(format!(
                "Dispatched {} steps across {} plans",
                report.steps_dispatched, report.plans_scanned
            ));
            return self.renderer.render(&status.to_string());
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupt received, stopping execution loop");
                let _ = shutdown_tx.send(true);
            }
        });

        executor.run(shutdown_rx).await;
        Ok(())
    }
}

/// Reads a JSON array of tool names or `{name, description}` records.
fn load_tools(path: &Path) -> Result<Vec<ToolSpec>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read tools file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse tools file {}", path.display()))
}
