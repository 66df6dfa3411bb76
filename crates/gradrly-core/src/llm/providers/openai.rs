use crate::core_types::{LLMResponse, Message, Role};
use crate::errors::GradingError;
use crate::llm::{ResponseParser, LLM};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

#[derive(Debug, Clone)]
pub struct OpenAIClient {
    client: Client,
    api_key: String,
    api_base: String,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl OpenAIClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            api_base: "https://api.openai.com/v1".to_string(),
            model,
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_api_base(mut self, api_base: String) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    fn build_request_body(&self, messages: &[Message], max_tokens: Option<u32>) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": self.format_messages(messages),
        });

        if let Some(temp) = self.temperature {
            body["temperature"] = temp.into();
        }

        if let Some(max_tokens) = max_tokens.or(self.max_tokens) {
            body["max_tokens"] = max_tokens.into();
        }

        body
    }

    fn format_messages(&self, messages: &[Message]) -> Vec<Value> {
        messages
            .iter()
            .map(|msg| {
                json!({
                    "role": self.format_role(&msg.role),
                    "content": msg.content
                })
            })
            .collect()
    }

    fn format_role(&self, role: &Role) -> &'static str {
        match role {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

#[async_trait]
impl LLM for OpenAIClient {
    async fn generate(
        &self,
        messages: Vec<Message>,
        max_tokens: Option<u32>,
    ) -> Result<LLMResponse, GradingError> {
        let url = format!("{}/chat/completions", self.api_base);
        let body = self.build_request_body(&messages, max_tokens);

        log::debug!("OpenAI API request to {}", url);
        log::debug!(
            "Request body: {}",
            serde_json::to_string_pretty(&body).unwrap_or_default()
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| GradingError::LLMError(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| GradingError::LLMError(format!("Failed to read response: {}", e)))?;

        log::debug!("OpenAI API response ({}): {}", status, response_text);

        if !status.is_success() {
            return Err(GradingError::LLMError(format!(
                "API request failed with status {}: {}",
                status, response_text
            )));
        }

        let response_json: Value = serde_json::from_str(&response_text)
            .map_err(|e| GradingError::ParsingError(format!("Invalid JSON response: {}", e)))?;

        ResponseParser::parse_chat_response(response_json)
    }
}

// Gemini-compatible client (uses OpenAI protocol but different endpoint)
#[derive(Debug, Clone)]
pub struct GeminiClient {
    openai_client: OpenAIClient,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String) -> Self {
        let openai_client = OpenAIClient::new(api_key, model)
            .with_api_base("https://generativelanguage.googleapis.com/v1beta".to_string());

        Self { openai_client }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.openai_client = self.openai_client.with_temperature(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.openai_client = self.openai_client.with_max_tokens(max_tokens);
        self
    }
}

#[async_trait]
impl LLM for GeminiClient {
    async fn generate(
        &self,
        messages: Vec<Message>,
        max_tokens: Option<u32>,
    ) -> Result<LLMResponse, GradingError> {
        self.openai_client.generate(messages, max_tokens).await
    }
}

fn resolve_api_key(config: &crate::config::LlmConfig) -> Result<String, GradingError> {
    config
        .auth
        .api_key
        .clone()
        .or_else(|| {
            config
                .auth
                .api_key_env
                .as_ref()
                .and_then(|env_var| std::env::var(env_var).ok())
        })
        .ok_or_else(|| {
            GradingError::ConfigError(
                "No API key found for LLM provider. Set api_key or api_key_env".to_string(),
            )
        })
}

/// Create an OpenAI LLM client from configuration
pub fn create_client(
    config: &crate::config::LlmConfig,
) -> Result<std::sync::Arc<dyn LLM>, GradingError> {
    let api_key = resolve_api_key(config)?;

    let mut client = OpenAIClient::new(api_key, config.model.clone());

    if config.parameters.temperature > 0.0 {
        client = client.with_temperature(config.parameters.temperature);
    }
    if config.parameters.max_tokens > 0 {
        client = client.with_max_tokens(config.parameters.max_tokens);
    }

    Ok(std::sync::Arc::new(client))
}

/// Create a Gemini client speaking the OpenAI-compatible protocol
pub fn create_gemini_client(
    config: &crate::config::LlmConfig,
) -> Result<std::sync::Arc<dyn LLM>, GradingError> {
    let api_key = resolve_api_key(config)?;

    let mut client = GeminiClient::new(api_key, config.model.clone());

    if config.parameters.temperature > 0.0 {
        client = client.with_temperature(config.parameters.temperature);
    }
    if config.parameters.max_tokens > 0 {
        client = client.with_max_tokens(config.parameters.max_tokens);
    }

    Ok(std::sync::Arc::new(client))
}

/// Create an OpenAI-compatible client for custom endpoints
pub fn create_custom_client(
    config: &crate::config::LlmConfig,
    base_url: &str,
) -> Result<std::sync::Arc<dyn LLM>, GradingError> {
    let api_key = resolve_api_key(config)?;

    let mut client =
        OpenAIClient::new(api_key, config.model.clone()).with_api_base(base_url.to_string());

    if config.parameters.temperature > 0.0 {
        client = client.with_temperature(config.parameters.temperature);
    }
    if config.parameters.max_tokens > 0 {
        client = client.with_max_tokens(config.parameters.max_tokens);
    }

    Ok(std::sync::Arc::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_client_creation() {
        let client = OpenAIClient::new("test-key".to_string(), "gpt-4".to_string())
            .with_temperature(0.3)
            .with_max_tokens(2000);

        assert_eq!(client.api_key, "test-key");
        assert_eq!(client.model, "gpt-4");
        assert_eq!(client.temperature, Some(0.3));
        assert_eq!(client.max_tokens, Some(2000));
    }

    #[test]
    fn test_message_formatting() {
        let client = OpenAIClient::new("test-key".to_string(), "gpt-4".to_string());

        let messages = vec![
            Message::system("You are an expert academic grader."),
            Message::user("Grade this submission."),
        ];

        let formatted = client.format_messages(&messages);
        assert_eq!(formatted.len(), 2);
        assert_eq!(formatted[0]["role"], "system");
        assert_eq!(formatted[0]["content"], "You are an expert academic grader.");
        assert_eq!(formatted[1]["role"], "user");
        assert_eq!(formatted[1]["content"], "Grade this submission.");
    }

    #[test]
    fn test_max_tokens_override() {
        let client = OpenAIClient::new("test-key".to_string(), "gpt-4".to_string())
            .with_max_tokens(2000);

        let messages = vec![Message::user("hi")];
        let body = client.build_request_body(&messages, Some(500));
        assert_eq!(body["max_tokens"], 500);

        let body = client.build_request_body(&messages, None);
        assert_eq!(body["max_tokens"], 2000);
    }

    #[tokio::test]
    async fn test_generate_against_mock_endpoint() {
        use crate::test_utils::mock_llm_server::{MockLLMServer, MockReply};

        let server = MockLLMServer::start(vec![MockReply::Text("graded".to_string())]).await;
        let client = OpenAIClient::new("test-key".to_string(), "gpt-4".to_string())
            .with_api_base(server.address())
            .with_temperature(0.3);

        let response = client
            .generate(vec![Message::user("grade this")], Some(123))
            .await
            .unwrap();
        assert_eq!(response.content.as_deref(), Some("graded"));

        let requests = server.get_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0]["model"], "gpt-4");
        assert_eq!(requests[0]["max_tokens"], 123);
        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_generate_surfaces_http_errors() {
        use crate::test_utils::mock_llm_server::{MockLLMServer, MockReply};

        let server = MockLLMServer::start(vec![MockReply::Status(429)]).await;
        let client = OpenAIClient::new("test-key".to_string(), "gpt-4".to_string())
            .with_api_base(server.address());

        let err = client
            .generate(vec![Message::user("grade this")], None)
            .await
            .unwrap_err();
        assert!(matches!(err, GradingError::LLMError(_)));
        server.shutdown().await;
    }

    #[test]
    fn test_gemini_client_creation() {
        let client = GeminiClient::new("test-key".to_string(), "gemini-2.0-flash".to_string())
            .with_temperature(0.3);

        assert!(client
            .openai_client
            .api_base
            .contains("generativelanguage.googleapis.com"));
    }
}
