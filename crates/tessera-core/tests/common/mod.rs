#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use tempfile::TempDir;
use tessera_core::{
    error::{Result, TesseraError},
    llm::{ChatMessage, CompletionError, CompletionParams, CompletionService},
    models::{AgentMessage, Plan, Step},
    Dispatcher, MemoryStore, PlanStore, SqliteStore, StoreBuilder,
};
use uuid::Uuid;

/// Helper function to create a SQLite store in a fresh temp directory.
pub async fn create_test_store() -> (TempDir, Arc<SqliteStore>) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let store = StoreBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to create store");
    (temp_dir, Arc::new(store))
}

/// A plan response naming two available agents.
pub const TWO_STEP_RESPONSE: &str = r#"{
  "initial_goal": "Analyze AAPL earnings",
  "steps": [
    {"action": "Pull the latest earnings call transcript", "agent": "EarningCallsAnalystAgent"},
    {"action": "Summarize management guidance", "agent": "GenericAgent"}
  ],
  "summary_plan_and_steps": "Fetch the transcript, then summarize guidance.",
  "human_clarification_request": null
}"#;

enum Reply {
    Text(String),
    Fail,
    Hang,
}

/// Completion service that replays scripted replies and records prompts.
#[derive(Default)]
pub struct ScriptedCompletion {
    replies: Mutex<VecDeque<Reply>>,
    prompts: Mutex<Vec<(Vec<ChatMessage>, CompletionParams)>>,
}

impl ScriptedCompletion {
    pub fn replying(text: &str) -> Arc<Self> {
        let scripted = Self::default();
        scripted.push(Reply::Text(text.to_string()));
        Arc::new(scripted)
    }

    pub fn failing() -> Arc<Self> {
        let scripted = Self::default();
        scripted.push(Reply::Fail);
        Arc::new(scripted)
    }

    /// Never answers; the caller's timeout has to fire.
    pub fn hanging() -> Arc<Self> {
        let scripted = Self::default();
        scripted.push(Reply::Hang);
        Arc::new(scripted)
    }

    fn push(&self, reply: Reply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn prompts(&self) -> Vec<(Vec<ChatMessage>, CompletionParams)> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionService for ScriptedCompletion {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: &CompletionParams,
    ) -> std::result::Result<String, CompletionError> {
        self.prompts
            .lock()
            .unwrap()
            .push((messages.to_vec(), *params));
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Fail) | None => Err(CompletionError::Api {
                status: 500,
                message: "scripted failure".to_string(),
            }),
            Some(Reply::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(CompletionError::InvalidResponse("unreachable".to_string()))
            }
        }
    }
}

/// Records every dispatch and succeeds.
#[derive(Default)]
pub struct RecordingDispatcher {
    sent: Mutex<Vec<(String, String, Uuid)>>,
}

impl RecordingDispatcher {
    pub fn sent(&self) -> Vec<(String, String, Uuid)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Dispatcher for RecordingDispatcher {
    async fn send(&self, agent_name: &str, session_id: &str, step: &Step) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((agent_name.to_string(), session_id.to_string(), step.id));
        Ok(())
    }
}

/// Fails every dispatch, checking first that the step was not yet written
/// back as completed.
pub struct FailingDispatcher {
    pub store: Arc<dyn PlanStore>,
    pub attempts: Mutex<usize>,
}

#[async_trait]
impl Dispatcher for FailingDispatcher {
    async fn send(&self, agent_name: &str, _session_id: &str, step: &Step) -> Result<()> {
        *self.attempts.lock().unwrap() += 1;
        let stored = self.store.get_step(step.id).await?;
        assert_ne!(
            stored.map(|s| s.status),
            Some(tessera_core::StepStatus::Completed),
            "step written back before dispatch returned"
        );
        Err(TesseraError::dispatch(agent_name, "agent unavailable"))
    }
}

/// Store wrapper whose plan writes can be made to fail.
pub struct FlakyStore {
    pub inner: MemoryStore,
    pub fail_batches: bool,
    pub fail_plans: bool,
}

impl FlakyStore {
    pub fn failing_batches() -> Self {
        Self {
            inner: MemoryStore::new(),
            fail_batches: true,
            fail_plans: false,
        }
    }

    pub fn failing_all_plan_writes() -> Self {
        Self {
            inner: MemoryStore::new(),
            fail_batches: true,
            fail_plans: true,
        }
    }

    fn unavailable() -> TesseraError {
        TesseraError::configuration("store unavailable")
    }
}

#[async_trait]
impl PlanStore for FlakyStore {
    async fn add_plan(&self, plan: &Plan) -> Result<()> {
        if self.fail_plans {
            return Err(Self::unavailable());
        }
        self.inner.add_plan(plan).await
    }

    async fn add_step(&self, step: &Step) -> Result<()> {
        self.inner.add_step(step).await
    }

    async fn add_plan_with_steps(&self, plan: &Plan, steps: &[Step]) -> Result<()> {
        if self.fail_batches {
            return Err(Self::unavailable());
        }
        self.inner.add_plan_with_steps(plan, steps).await
    }

    async fn add_message(&self, message: &AgentMessage) -> Result<()> {
        self.inner.add_message(message).await
    }

    async fn get_plan(&self, id: Uuid) -> Result<Option<Plan>> {
        self.inner.get_plan(id).await
    }

    async fn get_all_plans(&self) -> Result<Vec<Plan>> {
        self.inner.get_all_plans().await
    }

    async fn get_plans_by_session(&self, session_id: &str) -> Result<Vec<Plan>> {
        self.inner.get_plans_by_session(session_id).await
    }

    async fn get_steps_by_plan(&self, plan_id: Uuid) -> Result<Vec<Step>> {
        self.inner.get_steps_by_plan(plan_id).await
    }

    async fn get_step(&self, id: Uuid) -> Result<Option<Step>> {
        self.inner.get_step(id).await
    }

    async fn update_step(&self, step: &Step) -> Result<()> {
        self.inner.update_step(step).await
    }

    async fn get_messages_by_session(&self, session_id: &str) -> Result<Vec<AgentMessage>> {
        self.inner.get_messages_by_session(session_id).await
    }
}
