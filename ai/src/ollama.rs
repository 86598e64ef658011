//! Local Ollama backend.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::CompletionBackend;
use crate::error::{AiError, Result};

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Client for Ollama's `/api/generate` endpoint.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    /// Creates a client; `None` selects the defaults.
    pub fn new(base_url: Option<&str>, model: Option<&str>, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url
                .unwrap_or(DEFAULT_OLLAMA_URL)
                .trim_end_matches('/')
                .to_string(),
            model: model.unwrap_or(DEFAULT_OLLAMA_MODEL).to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }
}

impl CompletionBackend for OllamaClient {
    fn name(&self) -> &'static str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn complete(&self, prompt: &str) -> Result<String> {
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };
        let endpoint = self.endpoint();
        debug!(endpoint = %endpoint, model = %self.model, "Sending generate request");

        let response = self.http.post(&endpoint).json(&body).send()?;
        let status = response.status();
        let raw = response.text()?;
        debug!(status = %status, bytes = raw.len(), "Received generate response");
        parse_generate_response(&raw)
    }
}

/// Extracts the generated text, surfacing Ollama's `{"error": ...}` objects.
fn parse_generate_response(raw: &str) -> Result<String> {
    let parsed: GenerateResponse = serde_json::from_str(raw)?;
    if let Some(message) = parsed.error {
        return Err(AiError::Api {
            backend: "ollama",
            message,
        });
    }
    Ok(parsed.response.unwrap_or_default())
}
