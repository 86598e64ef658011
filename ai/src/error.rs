//! Error types for the AI fallback.

use thiserror::Error;

/// Errors from AI backends and reply handling.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("could not parse backend response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("OpenAI API key not provided (use --api-key or set OPENAI_API_KEY)")]
    MissingApiKey,

    #[error("{backend} error: {message}")]
    Api {
        backend: &'static str,
        message: String,
    },

    #[error("{backend} returned no choices")]
    NoChoices { backend: &'static str },

    #[error("AI reply for `{program}` contained no FLAG or SUBCOMMAND lines")]
    EmptyReply { program: String },

    #[error("unknown AI backend `{0}` (use ollama or openai)")]
    UnknownBackend(String),
}

/// Convenience alias for results with [`AiError`].
pub type Result<T> = std::result::Result<T, AiError>;
