//! Language model provider abstractions and integrations.
//!
//! Defines the core LLM trait and implementations for OpenAI-compatible
//! providers, plus utilities for parsing chat-completion responses. The
//! grading service holds the model behind `Arc<dyn LLM>` so that tests can
//! substitute a scripted client for the real endpoint.

pub use crate::core_types::{LLMResponse, Message};
use crate::errors::GradingError;
use async_trait::async_trait;

pub mod providers;
pub mod response_parser;

pub use response_parser::ResponseParser;

#[async_trait]
pub trait LLM: Send + Sync {
    /// Sends a conversation to the model and returns its reply.
    ///
    /// `max_tokens` overrides the client's configured completion budget for
    /// this call; `None` keeps the configured value.
    async fn generate(
        &self,
        messages: Vec<Message>,
        max_tokens: Option<u32>,
    ) -> Result<LLMResponse, GradingError>;
}
