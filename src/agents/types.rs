//! Core types for the agent system.

use crate::llm::{ChatMessage, LlmError, Role};

/// One step of a supervisor run: the messages a node added to the history.
#[derive(Debug, Clone)]
pub struct AgentUpdate {
    /// `supervisor` or the name of the agent that ran
    pub node: String,
    pub messages: Vec<ChatMessage>,
}

/// Full message history of a finished run.
#[derive(Debug, Clone)]
pub struct Transcript {
    pub messages: Vec<ChatMessage>,
}

impl Transcript {
    /// Text of the last assistant message, i.e. the supervisor's answer.
    pub fn final_answer(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
            .and_then(|m| m.text_content())
    }
}

/// Errors that can occur in agent operations.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("LLM error in {agent}: {source}")]
    Llm {
        agent: String,
        #[source]
        source: LlmError,
    },

    #[error("{agent} reached max iterations ({limit}) without a final answer")]
    MaxIterations { agent: String, limit: usize },
}
