//! The closed set of agents a plan step can be assigned to.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Named agents known to the planner.
///
/// The serialized form is the exact variant name, which is also what the
/// completion service is asked to emit in each step's `agent` field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AgentType {
    HumanAgent,
    GenericAgent,
    EarningCallsAnalystAgent,
    CompanyAnalystAgent,
    SecAnalystAgent,
    TechnicalAnalysisAgent,
}

impl AgentType {
    /// Every agent, in prompt order.
    pub const ALL: [AgentType; 6] = [
        AgentType::HumanAgent,
        AgentType::GenericAgent,
        AgentType::EarningCallsAnalystAgent,
        AgentType::CompanyAnalystAgent,
        AgentType::SecAnalystAgent,
        AgentType::TechnicalAnalysisAgent,
    ];

    /// Canonical agent name.
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentType::HumanAgent => "HumanAgent",
            AgentType::GenericAgent => "GenericAgent",
            AgentType::EarningCallsAnalystAgent => "EarningCallsAnalystAgent",
            AgentType::CompanyAnalystAgent => "CompanyAnalystAgent",
            AgentType::SecAnalystAgent => "SecAnalystAgent",
            AgentType::TechnicalAnalysisAgent => "TechnicalAnalysisAgent",
        }
    }

    /// Name under which the agent receives dispatched steps.
    pub fn dispatch_name(&self) -> String {
        self.as_str().to_lowercase()
    }
}

impl FromStr for AgentType {
    type Err = String;

    /// Parses the exact canonical name. Model output is matched strictly so
    /// that near-miss names are rejected rather than guessed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentType::ALL
            .into_iter()
            .find(|agent| agent.as_str() == s)
            .ok_or_else(|| format!("Unknown agent: {s}"))
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
