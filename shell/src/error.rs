//! Error types for shell handling.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from shell detection and completion installation.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("shell `{0}` is not supported (supported: fish, bash, zsh)")]
    Unsupported(String),

    #[error("could not detect current shell: $SHELL is not set")]
    Undetected,

    #[error("could not determine the home directory")]
    NoHomeDir,

    #[error("could not write completions to {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias for results with [`ShellError`].
pub type Result<T> = std::result::Result<T, ShellError>;
