//! Scripted LLM for agent tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ChatMessage, ChatResponse, LlmClient, LlmError, ToolCall, ToolDefinition};

/// A request as seen by the scripted client.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub tool_names: Vec<String>,
}

/// Replays queued responses in order and records every request.
#[derive(Default)]
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<Result<ChatResponse, LlmError>>>,
    seen: Mutex<Vec<SeenRequest>>,
}

impl ScriptedLlm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply_text(self, text: &str) -> Self {
        self.push(Ok(ChatResponse {
            content: Some(text.to_string()),
            finish_reason: Some("stop".to_string()),
            ..Default::default()
        }))
    }

    pub fn reply_calls(self, calls: Vec<ToolCall>) -> Self {
        self.push(Ok(ChatResponse {
            tool_calls: Some(calls),
            finish_reason: Some("tool_calls".to_string()),
            ..Default::default()
        }))
    }

    pub fn reply_error(self, error: LlmError) -> Self {
        self.push(Err(error))
    }

    fn push(self, reply: Result<ChatResponse, LlmError>) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.replies.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn chat_completion(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tools: Option<&[ToolDefinition]>,
    ) -> Result<ChatResponse, LlmError> {
        self.seen.lock().unwrap().push(SeenRequest {
            model: model.to_string(),
            messages: messages.to_vec(),
            tool_names: tools
                .unwrap_or_default()
                .iter()
                .map(|t| t.function.name.clone())
                .collect(),
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::parse_error("script exhausted".to_string())))
    }
}
