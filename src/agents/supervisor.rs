//! Supervisor - routes a conversation between worker agents via handoff tools.

use serde_json::json;
use tokio::sync::mpsc::UnboundedSender;

use crate::agents::{AgentError, AgentUpdate, ToolAgent, Transcript};
use crate::llm::{ChatMessage, FunctionDefinition, LlmClient, ToolCall, ToolDefinition};
use crate::prompts::SUPERVISOR_NAME;

const HANDOFF_PREFIX: &str = "transfer_to_";
const HANDOFF_BACK_TOOL: &str = "transfer_back_to_supervisor";

/// Coordinates a set of [`ToolAgent`]s.
///
/// The supervisor model sees one `transfer_to_<agent>` tool per agent. Each
/// turn it either answers the user directly (which ends the run) or hands
/// the conversation to exactly one agent, whose messages are appended to the
/// shared history before the supervisor is asked again.
pub struct Supervisor {
    model: String,
    prompt: String,
    agents: Vec<ToolAgent>,
    max_iterations: usize,
    add_handoff_back_messages: bool,
}

impl Supervisor {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>, agents: Vec<ToolAgent>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            agents,
            max_iterations: super::DEFAULT_MAX_ITERATIONS,
            add_handoff_back_messages: true,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Whether agents' turns end with a synthetic transfer back to the supervisor.
    pub fn with_handoff_back_messages(mut self, enabled: bool) -> Self {
        self.add_handoff_back_messages = enabled;
        self
    }

    pub fn agents(&self) -> &[ToolAgent] {
        &self.agents
    }

    /// Handoff tool definitions, one per agent.
    pub fn handoff_tools(&self) -> Vec<ToolDefinition> {
        self.agents
            .iter()
            .map(|agent| ToolDefinition {
                tool_type: "function".to_string(),
                function: FunctionDefinition {
                    name: format!("{}{}", HANDOFF_PREFIX, agent.name()),
                    description: format!("Ask agent '{}' for help", agent.name()),
                    parameters: json!({"type": "object", "properties": {}}),
                },
            })
            .collect()
    }

    fn agent_for_tool(&self, tool_name: &str) -> Option<&ToolAgent> {
        let name = tool_name.strip_prefix(HANDOFF_PREFIX)?;
        self.agents.iter().find(|agent| agent.name() == name)
    }

    fn handoff_back_messages(&self, agent: &ToolAgent, call_id: String) -> [ChatMessage; 2] {
        let call = ToolCall::function(&call_id, HANDOFF_BACK_TOOL, "{}");
        [
            ChatMessage::assistant(
                Some("Transferring back to supervisor".to_string()),
                Some(vec![call]),
            )
            .with_name(agent.name()),
            ChatMessage::tool_result(call_id, "Successfully transferred back to supervisor"),
        ]
    }

    /// Answer `user_message`, delegating to agents as the supervisor model decides.
    ///
    /// Every node step is also sent to `updates`; a closed receiver is ignored.
    pub async fn run(
        &self,
        llm: &dyn LlmClient,
        user_message: &str,
        updates: Option<&UnboundedSender<AgentUpdate>>,
    ) -> Result<Transcript, AgentError> {
        let mut history = vec![ChatMessage::user(user_message)];
        let tools = self.handoff_tools();
        let mut handoffs_back = 0usize;

        for turn in 0..self.max_iterations {
            tracing::debug!("supervisor turn {}", turn + 1);

            let mut request = Vec::with_capacity(history.len() + 1);
            request.push(ChatMessage::system(&self.prompt));
            request.extend_from_slice(&history);

            let response = llm
                .chat_completion(&self.model, &request, Some(tools.as_slice()))
                .await
                .map_err(|source| AgentError::Llm {
                    agent: SUPERVISOR_NAME.to_string(),
                    source,
                })?;

            let message = response.into_message().with_name(SUPERVISOR_NAME);
            let calls = message.requested_calls().to_vec();
            let mut step = vec![message];

            if calls.is_empty() {
                history.extend_from_slice(&step);
                emit(updates, SUPERVISOR_NAME, step);
                tracing::info!("supervisor answered after {} turns", turn + 1);
                return Ok(Transcript { messages: history });
            }

            let mut target: Option<&ToolAgent> = None;
            for call in &calls {
                let reply = match self.agent_for_tool(&call.function.name) {
                    Some(agent) if target.is_none() => {
                        target = Some(agent);
                        format!("Successfully transferred to {}", agent.name())
                    }
                    Some(_) => "Error: assign work to one agent at a time".to_string(),
                    None => {
                        let valid: Vec<String> =
                            tools.iter().map(|t| t.function.name.clone()).collect();
                        format!(
                            "Error: {} is not a valid tool, try one of [{}].",
                            call.function.name,
                            valid.join(", ")
                        )
                    }
                };
                step.push(ChatMessage::tool_result(&call.id, reply));
            }
            history.extend_from_slice(&step);
            emit(updates, SUPERVISOR_NAME, step);

            let Some(agent) = target else {
                tracing::warn!("supervisor requested no valid handoff");
                continue;
            };

            tracing::info!("handing off to {}", agent.name());
            let mut produced = agent.run(llm, &history).await?;
            if self.add_handoff_back_messages {
                handoffs_back += 1;
                produced.extend(self.handoff_back_messages(
                    agent,
                    format!("call_handoff_back_{}", handoffs_back),
                ));
            }
            history.extend_from_slice(&produced);
            emit(updates, agent.name(), produced);
        }

        Err(AgentError::MaxIterations {
            agent: SUPERVISOR_NAME.to_string(),
            limit: self.max_iterations,
        })
    }
}

fn emit(updates: Option<&UnboundedSender<AgentUpdate>>, node: &str, messages: Vec<ChatMessage>) {
    if let Some(tx) = updates {
        let _ = tx.send(AgentUpdate {
            node: node.to_string(),
            messages,
        });
    }
}
