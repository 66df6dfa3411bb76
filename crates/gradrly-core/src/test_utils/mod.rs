//! Shared test helpers: a scripted in-process LLM and a mock
//! chat-completions HTTP endpoint.

pub mod mock_llm_server;

pub use mock_llm_server::MockLLMServer;

use crate::core_types::{LLMResponse, Message};
use crate::errors::GradingError;
use crate::llm::LLM;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub messages: Vec<Message>,
    pub max_tokens: Option<u32>,
}

/// An LLM stub that replays queued replies and records every call.
pub struct ScriptedLLM {
    replies: Mutex<VecDeque<Result<String, GradingError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedLLM {
    pub fn with_replies(replies: Vec<Result<String, GradingError>>) -> Self {
        Self {
            replies: Mutex::new(VecDeque::from(replies)),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LLM for ScriptedLLM {
    async fn generate(
        &self,
        messages: Vec<Message>,
        max_tokens: Option<u32>,
    ) -> Result<LLMResponse, GradingError> {
        self.calls.lock().unwrap().push(RecordedCall {
            messages,
            max_tokens,
        });

        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(content)) => Ok(LLMResponse {
                content: Some(content),
                finish_reason: Some("stop".to_string()),
                usage: None,
            }),
            Some(Err(err)) => Err(err),
            None => Err(GradingError::LLMError(
                "ScriptedLLM ran out of replies".to_string(),
            )),
        }
    }
}
