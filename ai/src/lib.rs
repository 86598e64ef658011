//! AI fallback for programs whose documentation cannot be parsed.
//!
//! A [`CompletionBackend`] sends the prompt from [`build_prompt`] to a
//! language model and returns the raw reply; [`parse_reply`] turns the
//! `FLAG|...` / `SUBCOMMAND|...` lines of that reply into a one-level
//! [`Command`] tree.
//!
//! ```no_run
//! use autocompletor_ai::{AiOptions, Backend, infer_tree};
//!
//! let client = Backend::Ollama.client(&AiOptions::default())?;
//! let tree = infer_tree(client.as_ref(), "gobuster", "fish")?;
//! println!("{} flags", tree.flags.len());
//! # Ok::<(), autocompletor_ai::AiError>(())
//! ```

pub mod error;
pub mod ollama;
pub mod openai;
mod prompt;
mod reply;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use autocompletor_core::Command;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub use error::{AiError, Result};
pub use ollama::OllamaClient;
pub use openai::OpenAiClient;
pub use prompt::build_prompt;
pub use reply::parse_reply;

/// Default bound on one model request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// A language model service that answers a prompt with text.
pub trait CompletionBackend {
    /// Short backend name used in logs and errors.
    fn name(&self) -> &'static str;

    fn model(&self) -> &str;

    /// Sends `prompt` and returns the model's raw reply.
    fn complete(&self, prompt: &str) -> Result<String>;
}

/// Which service answers the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Ollama,
    OpenAi,
}

/// Settings shared by all backends. `None` selects the backend default.
#[derive(Clone)]
pub struct AiOptions {
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub ollama_url: Option<String>,
    pub timeout: Duration,
}

impl Default for AiOptions {
    fn default() -> Self {
        Self {
            model: None,
            api_key: None,
            ollama_url: None,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl fmt::Debug for AiOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AiOptions")
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("ollama_url", &self.ollama_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Backend {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::OpenAi => "openai",
        }
    }

    /// Creates the client for this backend.
    ///
    /// # Errors
    ///
    /// [`AiError::MissingApiKey`] for OpenAI without a key, or
    /// [`AiError::Http`] when the HTTP client cannot be built.
    pub fn client(self, options: &AiOptions) -> Result<Box<dyn CompletionBackend>> {
        let model = options.model.as_deref();
        Ok(match self {
            Self::Ollama => Box::new(OllamaClient::new(
                options.ollama_url.as_deref(),
                model,
                options.timeout,
            )?),
            Self::OpenAi => Box::new(OpenAiClient::new(
                options.api_key.as_deref(),
                model,
                options.timeout,
            )?),
        })
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = AiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "openai" => Ok(Self::OpenAi),
            _ => Err(AiError::UnknownBackend(s.to_string())),
        }
    }
}

/// Asks `backend` for the flags and subcommands of `program`.
///
/// # Errors
///
/// Propagates backend failures and returns [`AiError::EmptyReply`] when the
/// reply holds no usable record.
pub fn infer_tree(backend: &dyn CompletionBackend, program: &str, shell: &str) -> Result<Command> {
    info!(
        backend = backend.name(),
        model = backend.model(),
        program,
        "Asking AI backend for completions"
    );
    let reply = backend.complete(&build_prompt(program, shell))?;
    let tree = parse_reply(program, &reply);
    if tree.is_empty() {
        warn!(backend = backend.name(), program, "AI reply had no usable records");
        return Err(AiError::EmptyReply {
            program: program.to_string(),
        });
    }
    Ok(tree)
}
