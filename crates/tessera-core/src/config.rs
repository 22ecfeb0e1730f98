//! Runtime configuration for the completion client, the planner and the
//! execution loop.
//!
//! Clients are configured explicitly and constructed once by the caller;
//! nothing in this crate caches a client globally.

use std::{env, time::Duration};

use crate::{
    error::{Result, TesseraError},
    models::AgentType,
};

pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_API_BASE: &str = "OPENAI_API_BASE";
pub const ENV_API_VERSION: &str = "OPENAI_API_VERSION";
pub const ENV_API_MODEL: &str = "OPENAI_API_MODEL";
pub const ENV_COMPLETION_TIMEOUT: &str = "TESSERA_COMPLETION_TIMEOUT_SECS";

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o";
const DEFAULT_COMPLETION_TIMEOUT_SECS: u64 = 120;

/// Connection settings for the completion service.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub api_key: String,
    pub base_url: String,
    pub api_version: Option<String>,
    pub model: String,
    /// Per-request HTTP timeout
    pub request_timeout: Duration,
}

impl CompletionConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `TesseraError::Configuration` if `OPENAI_API_KEY` is missing or
    /// the timeout is not a whole number of seconds.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = non_empty(ENV_API_KEY).ok_or_else(|| {
            TesseraError::configuration(format!("Missing required config value for: {ENV_API_KEY}"))
        })?;

        let timeout_secs = match non_empty(ENV_COMPLETION_TIMEOUT) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                TesseraError::configuration(format!("{ENV_COMPLETION_TIMEOUT}: {e}"))
            })?,
            None => DEFAULT_COMPLETION_TIMEOUT_SECS,
        };

        Ok(Self {
            api_key,
            base_url: non_empty(ENV_API_BASE).unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            api_version: non_empty(ENV_API_VERSION),
            model: non_empty(ENV_API_MODEL).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// A tool advertised to the planner, either by bare name or as a record
/// carrying a `name` field.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(untagged)]
pub enum ToolSpec {
    Name(String),
    Record {
        name: String,
        #[serde(default)]
        description: Option<String>,
    },
}

impl ToolSpec {
    /// Name shown to the model.
    pub fn display_name(&self) -> &str {
        match self {
            ToolSpec::Name(name) => name,
            ToolSpec::Record { name, .. } => name,
        }
    }
}

impl From<&str> for ToolSpec {
    fn from(name: &str) -> Self {
        ToolSpec::Name(name.to_string())
    }
}

/// Settings for the structured plan generator.
///
/// `available_agents` is the single source of truth for the agent set: the
/// prompt lists exactly these agents and the validator accepts nothing else.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub available_agents: Vec<AgentType>,
    pub tools: Vec<ToolSpec>,
    pub temperature: f32,
    pub completion_timeout: Duration,
}

impl PlannerConfig {
    /// Replaces the advertised tools.
    pub fn with_tools<I, T>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ToolSpec>,
    {
        self.tools = tools.into_iter().map(Into::into).collect();
        self
    }

    /// Restricts the planner to a subset of agents.
    pub fn with_agents(mut self, agents: &[AgentType]) -> Self {
        self.available_agents = agents.to_vec();
        self
    }

    /// Sets how long a single completion call may take.
    pub fn with_completion_timeout(mut self, timeout: Duration) -> Self {
        self.completion_timeout = timeout;
        self
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            available_agents: AgentType::ALL.to_vec(),
            tools: Vec::new(),
            temperature: 0.3,
            completion_timeout: Duration::from_secs(DEFAULT_COMPLETION_TIMEOUT_SECS),
        }
    }
}

/// Timing of the background execution loop.
#[derive(Debug, Clone, Copy)]
pub struct LoopConfig {
    /// Sleep after a successful sweep
    pub poll_interval: Duration,
    /// Sleep after a failed sweep
    pub failure_backoff: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(10),
            failure_backoff: Duration::from_secs(30),
        }
    }
}
