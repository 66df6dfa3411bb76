use crate::core_types::{LLMResponse, Usage};
use crate::errors::GradingError;
use serde_json::Value;

pub struct ResponseParser;

impl ResponseParser {
    /// Parses a chat-completion response body into an `LLMResponse`.
    pub fn parse_chat_response(response: Value) -> Result<LLMResponse, GradingError> {
        let choices = response["choices"]
            .as_array()
            .ok_or_else(|| GradingError::ParsingError("No choices in response".to_string()))?;

        if choices.is_empty() {
            return Err(GradingError::ParsingError("Empty choices array".to_string()));
        }

        let choice = &choices[0];
        let message = &choice["message"];

        let content = message["content"].as_str().map(|s| s.to_string());

        if content.is_none() {
            return Err(GradingError::ParsingError(
                "Response message has no text content".to_string(),
            ));
        }

        let finish_reason = choice["finish_reason"].as_str().map(|s| s.to_string());

        let usage = serde_json::from_value::<Usage>(response["usage"].clone()).ok();

        Ok(LLMResponse {
            content,
            finish_reason,
            usage,
        })
    }

    /// Strips markdown code fences from model output.
    ///
    /// Models routinely wrap the requested JSON in ```json ... ``` even when
    /// told not to; the grading pipeline tolerates both fenced and bare
    /// output.
    pub fn strip_code_fences(text: &str) -> String {
        use regex::Regex;

        match Regex::new(r"```(?:json)?\n?|\n?```") {
            Ok(re) => re.replace_all(text, "").trim().to_string(),
            Err(_) => text.trim().to_string(),
        }
    }

    /// Extracts the outermost JSON object embedded in prose, if any.
    ///
    /// Used as a second chance when the whole reply fails to parse because
    /// the model prefixed or suffixed the object with commentary.
    pub fn extract_json_object(text: &str) -> Option<&str> {
        let start = text.find('{')?;
        let end = text.rfind('}')?;
        if end <= start {
            return None;
        }
        Some(&text[start..=end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_chat_response_with_content() {
        let response = json!({
            "choices": [{
                "message": {
                    "content": "{\"overallScore\": 92}"
                },
                "finish_reason": "stop"
            }],
            "usage": {
                "prompt_tokens": 510,
                "completion_tokens": 120,
                "total_tokens": 630
            }
        });

        let parsed = ResponseParser::parse_chat_response(response).unwrap();
        assert_eq!(parsed.content, Some("{\"overallScore\": 92}".to_string()));
        assert_eq!(parsed.finish_reason, Some("stop".to_string()));
        assert_eq!(parsed.usage.unwrap().total_tokens, 630);
    }

    #[test]
    fn test_parse_chat_response_without_content() {
        let response = json!({
            "choices": [{
                "message": {}
            }]
        });

        assert!(ResponseParser::parse_chat_response(response).is_err());
    }

    #[test]
    fn test_parse_chat_response_no_choices() {
        let response = json!({ "choices": [] });
        assert!(ResponseParser::parse_chat_response(response).is_err());

        let response = json!({ "error": "bad request" });
        assert!(ResponseParser::parse_chat_response(response).is_err());
    }

    #[test]
    fn test_strip_code_fences() {
        let fenced = "```json\n{\"a\": 1}\n```";
        assert_eq!(ResponseParser::strip_code_fences(fenced), "{\"a\": 1}");

        let plain_fence = "```\n{\"a\": 1}\n```";
        assert_eq!(ResponseParser::strip_code_fences(plain_fence), "{\"a\": 1}");

        let bare = "{\"a\": 1}";
        assert_eq!(ResponseParser::strip_code_fences(bare), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_json_object() {
        let text = "Here is the grading:\n{\"overallScore\": 80}\nLet me know!";
        assert_eq!(
            ResponseParser::extract_json_object(text),
            Some("{\"overallScore\": 80}")
        );

        assert_eq!(ResponseParser::extract_json_object("no json here"), None);
    }
}
