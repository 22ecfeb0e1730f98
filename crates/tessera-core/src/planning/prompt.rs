//! Instruction prompt for structured plan generation.

use crate::{config::ToolSpec, models::AgentType};

/// Upper bound on plan length requested from the model.
pub const MAX_PLAN_STEPS: usize = 10;

/// Renders the single instruction sent to the completion service.
///
/// The agent names come from `agents` in both places they appear, so the
/// prompt can never advertise an agent the validator would reject.
pub fn build_instruction(objective: &str, agents: &[AgentType], tools: &[ToolSpec]) -> String {
    let agent_names = agents
        .iter()
        .map(AgentType::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let tool_names = tools
        .iter()
        .map(ToolSpec::display_name)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"You are the Planner, an AI orchestrator that manages a group of AI agents to accomplish tasks.

Your goal is to decompose the following objective into a concise plan of action with up to {MAX_PLAN_STEPS} steps. Each step should be assigned to one of the available agents and specify exactly what to do.

Return the response strictly in the following JSON format, and nothing else:

{{
  "initial_goal": "<repeat the objective here>",
  "steps": [
    {{
      "action": "<short sentence, what the agent should do>",
      "agent": "<agent name (must be one of: {agent_names})>"
    }}
  ],
  "summary_plan_and_steps": "<a short summary under 50 words>",
  "human_clarification_request": "<optional: ask a question to clarify if needed, else null>"
}}

Do not include commentary or explanations outside the JSON.

---

The objective is:
{objective}

The available agents are:
{agent_names}

The available functions are:
{tool_names}
"#
    )
}
