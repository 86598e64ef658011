//! OpenAI chat completions backend.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::CompletionBackend;
use crate::error::{AiError, Result};

pub const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Client for the OpenAI chat completions API.
#[derive(Clone)]
pub struct OpenAiClient {
    http: Client,
    api_key: String,
    model: String,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl OpenAiClient {
    /// Creates a client. The key comes from `api_key`, else from
    /// `OPENAI_API_KEY`.
    pub fn new(api_key: Option<&str>, model: Option<&str>, timeout: Duration) -> Result<Self> {
        let api_key = resolve_api_key(api_key, |key| std::env::var(key).ok())?;
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_key,
            model: model.unwrap_or(DEFAULT_OPENAI_MODEL).to_string(),
        })
    }
}

impl CompletionBackend for OpenAiClient {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn complete(&self, prompt: &str) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };
        debug!(model = %self.model, "Sending chat completion request");

        let response = self
            .http
            .post(OPENAI_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()?;
        let status = response.status();
        let raw = response.text()?;
        debug!(status = %status, bytes = raw.len(), "Received chat completion response");
        parse_chat_response(&raw)
    }
}

/// An explicit, non-empty key wins over the environment.
fn resolve_api_key(explicit: Option<&str>, env: impl Fn(&str) -> Option<String>) -> Result<String> {
    explicit
        .map(str::to_string)
        .filter(|key| !key.trim().is_empty())
        .or_else(|| env(API_KEY_ENV).filter(|key| !key.trim().is_empty()))
        .ok_or(AiError::MissingApiKey)
}

fn parse_chat_response(raw: &str) -> Result<String> {
    let parsed: ChatResponse = serde_json::from_str(raw)?;
    if let Some(error) = parsed.error {
        return Err(AiError::Api {
            backend: "openai",
            message: error.message,
        });
    }
    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or(AiError::NoChoices { backend: "openai" })?;
    Ok(choice.message.content.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_api_key_precedence() {
        let env = |_: &str| Some("sk-env".to_string());
        assert_eq!(resolve_api_key(Some("sk-flag"), env).unwrap(), "sk-flag");
        assert_eq!(resolve_api_key(None, env).unwrap(), "sk-env");
        assert_eq!(resolve_api_key(Some(""), env).unwrap(), "sk-env");
        assert!(matches!(
            resolve_api_key(None, |_| None),
            Err(AiError::MissingApiKey)
        ));
        assert!(matches!(
            resolve_api_key(None, |_| Some("  ".to_string())),
            Err(AiError::MissingApiKey)
        ));
    }

    #[test]
    fn test_request_body_shape() {
        let body = ChatRequest {
            model: "gpt-4o-mini",
            messages: [ChatMessage {
                role: "user",
                content: "hi",
            }],
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "model": "gpt-4o-mini",
                "messages": [{"role": "user", "content": "hi"}]
            })
        );
    }

    #[test]
    fn test_parse_chat_response_takes_first_choice() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"SUBCOMMAND|dir|Dir mode"}},{"message":{"content":"ignored"}}]}"#;
        assert_eq!(parse_chat_response(raw).unwrap(), "SUBCOMMAND|dir|Dir mode");
    }

    #[test]
    fn test_parse_chat_response_errors() {
        let err = parse_chat_response(
            r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "openai error: Incorrect API key provided");

        let err = parse_chat_response(r#"{"choices":[]}"#).unwrap_err();
        assert!(matches!(err, AiError::NoChoices { .. }));
    }

    #[test]
    fn test_debug_hides_api_key() {
        let client = OpenAiClient::new(Some("sk-secret"), None, Duration::from_secs(5)).unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("gpt-4o-mini"));
    }

    #[test]
    #[ignore = "requires OPENAI_API_KEY and network access"]
    fn test_live_chat_completion() {
        let client = OpenAiClient::new(None, None, Duration::from_secs(60)).unwrap();
        let reply = client.complete("Reply with the word ok.").unwrap();
        assert!(!reply.is_empty());
    }
}
