//! Tool-using agent - the worker the supervisor hands tasks to.

use serde_json::Value;

use crate::agents::AgentError;
use crate::llm::{ChatMessage, LlmClient, ToolCall};
use crate::tools::ToolRegistry;

/// An agent that answers with the help of its own tools.
///
/// # Algorithm
/// 1. Prepend the system prompt to the conversation so far
/// 2. Call the LLM with the agent's tools
/// 3. If it requests tool calls: execute each, feed back the results
/// 4. Repeat until it answers without tool calls or max iterations
pub struct ToolAgent {
    name: String,
    model: String,
    prompt: String,
    tools: ToolRegistry,
    max_iterations: usize,
}

impl ToolAgent {
    pub fn new(
        name: impl Into<String>,
        model: impl Into<String>,
        prompt: impl Into<String>,
        tools: ToolRegistry,
    ) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            prompt: prompt.into(),
            tools,
            max_iterations: super::DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Execute a single tool call. Failures become text for the model.
    async fn execute_tool_call(&self, tool_call: &ToolCall) -> String {
        let raw = tool_call.function.arguments.trim();
        let args = if raw.is_empty() {
            Value::Object(Default::default())
        } else {
            match serde_json::from_str(raw) {
                Ok(args) => args,
                Err(e) => return format!("Error: invalid JSON arguments: {}", e),
            }
        };

        match self.tools.execute(&tool_call.function.name, args).await {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(
                    "{}: tool '{}' failed: {}",
                    self.name,
                    tool_call.function.name,
                    e
                );
                format!("Error: {}", e)
            }
        }
    }

    /// Run the agent on `history` and return the messages it produced.
    ///
    /// The last returned message is the agent's answer, tagged with its name.
    pub async fn run(
        &self,
        llm: &dyn LlmClient,
        history: &[ChatMessage],
    ) -> Result<Vec<ChatMessage>, AgentError> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ChatMessage::system(&self.prompt));
        messages.extend_from_slice(history);

        let mut produced = Vec::new();
        let tool_schemas = self.tools.get_tool_schemas();
        let tools = if tool_schemas.is_empty() {
            None
        } else {
            Some(tool_schemas.as_slice())
        };

        for iteration in 0..self.max_iterations {
            tracing::debug!("{} iteration {}", self.name, iteration + 1);

            let response = llm
                .chat_completion(&self.model, &messages, tools)
                .await
                .map_err(|source| AgentError::Llm {
                    agent: self.name.clone(),
                    source,
                })?;

            let message = response.into_message().with_name(&self.name);
            messages.push(message.clone());
            produced.push(message.clone());

            let tool_calls = message.requested_calls();
            if tool_calls.is_empty() {
                tracing::info!("{} finished after {} iterations", self.name, iteration + 1);
                return Ok(produced);
            }

            for tool_call in tool_calls {
                tracing::info!(
                    "{} calling {} with {}",
                    self.name,
                    tool_call.function.name,
                    tool_call.function.arguments
                );
                let result = self.execute_tool_call(tool_call).await;
                let tool_message = ChatMessage::tool_result(&tool_call.id, result);
                messages.push(tool_message.clone());
                produced.push(tool_message);
            }
        }

        Err(AgentError::MaxIterations {
            agent: self.name.clone(),
            limit: self.max_iterations,
        })
    }
}
