//! Error types for discovery.

use thiserror::Error;

/// Why a source produced no usable text.
///
/// Informational only: every reason is handled the same way (fall back or
/// degrade), the distinction shows up in logs and the build report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnavailableReason {
    /// The executable (target program or `man`) does not exist, or there is
    /// no manual entry.
    NotFound,
    /// The child ran past the timeout and was killed.
    TimedOut,
    /// The child exited without printing anything.
    EmptyOutput,
    /// The child could not be started.
    SpawnFailed(String),
    /// Waiting on the child failed.
    WaitFailed(String),
}

impl UnavailableReason {
    /// Stable snake_case code used in reports.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::TimedOut => "timed_out",
            Self::EmptyOutput => "empty_output",
            Self::SpawnFailed(_) => "spawn_failed",
            Self::WaitFailed(_) => "wait_failed",
        }
    }
}

impl std::fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SpawnFailed(detail) | Self::WaitFailed(detail) => {
                write!(f, "{}: {detail}", self.code())
            }
            _ => f.write_str(self.code()),
        }
    }
}

/// A man page or help invocation produced no usable text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no usable output from `{command}` ({reason})")]
pub struct SourceUnavailable {
    /// The invocation, space-joined (e.g. `man ls` or `git commit --help`).
    pub command: String,
    pub reason: UnavailableReason,
}

impl SourceUnavailable {
    pub fn new(argv: &[String], reason: UnavailableReason) -> Self {
        Self {
            command: argv.join(" "),
            reason,
        }
    }
}

/// Errors surfaced by the tree builder.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error(transparent)]
    SourceUnavailable(#[from] SourceUnavailable),

    #[error("maximum depth {max} exceeded at `{path}`")]
    DepthExceeded { path: String, max: usize },

    #[error(
        "no completions found for `{program}`: neither the man page nor --help/-h listed any flags or subcommands"
    )]
    NoCompletionsFound { program: String },

    #[error("failed to start probe worker pool: {0}")]
    WorkerPool(String),
}

/// Result type for discovery operations.
pub type Result<T> = std::result::Result<T, DiscoveryError>;
