//! Structured diagnostics for one tree build.

use serde::{Deserialize, Serialize};

use crate::error::SourceUnavailable;

/// Where a node's data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// The rendered manual page.
    Man,
    /// `--help` or `-h` output.
    Help,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Man => write!(f, "man"),
            Self::Help => write!(f, "help"),
        }
    }
}

/// What happened when a node was visited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NodeOutcome {
    /// Output was parsed into flags and subcommands.
    Probed,
    /// No usable output; the node keeps what its parent listing said.
    Unavailable { reason: String },
    /// The listing entry sat below the depth limit and was not added.
    DepthExceeded,
    /// The subcommand printed its parent's help; the output was discarded.
    ParentEcho,
}

impl NodeOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Probed => "probed",
            Self::Unavailable { .. } => "unavailable",
            Self::DepthExceeded => "depth_exceeded",
            Self::ParentEcho => "parent_echo",
        }
    }
}

/// Diagnostics for one visited node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeReport {
    /// Names from the root program down to this node.
    pub path: Vec<String>,
    pub source: SourceKind,
    pub flag_count: usize,
    pub subcommand_count: usize,
    pub outcome: NodeOutcome,
}

/// Diagnostics for one build run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildReport {
    pub program: String,
    /// RFC 3339 timestamp of the run.
    pub generated_at: String,
    /// Source the root's flags came from; `None` when the build failed.
    pub primary_source: Option<SourceKind>,
    pub nodes: Vec<NodeReport>,
    pub warnings: Vec<String>,
}

impl BuildReport {
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            primary_source: None,
            nodes: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub(crate) fn probed(
        &mut self,
        path: &[String],
        source: SourceKind,
        flag_count: usize,
        subcommand_count: usize,
    ) {
        self.push(path, source, NodeOutcome::Probed, flag_count, subcommand_count);
    }

    pub(crate) fn unavailable(&mut self, path: &[String], source: SourceKind, err: &SourceUnavailable) {
        self.push(
            path,
            source,
            NodeOutcome::Unavailable {
                reason: err.reason.to_string(),
            },
            0,
            0,
        );
    }

    pub(crate) fn outcome(&mut self, path: &[String], source: SourceKind, outcome: NodeOutcome) {
        self.push(path, source, outcome, 0, 0);
    }

    pub(crate) fn warn(&mut self, message: String) {
        if !self.warnings.contains(&message) {
            self.warnings.push(message);
        }
    }

    fn push(
        &mut self,
        path: &[String],
        source: SourceKind,
        outcome: NodeOutcome,
        flag_count: usize,
        subcommand_count: usize,
    ) {
        self.nodes.push(NodeReport {
            path: path.to_vec(),
            source,
            flag_count,
            subcommand_count,
            outcome,
        });
    }

    /// Number of nodes with the given outcome label.
    pub fn count(&self, label: &str) -> usize {
        self.nodes
            .iter()
            .filter(|node| node.outcome.label() == label)
            .count()
    }

    /// Finds the report for a node by its space-joined path.
    pub fn find(&self, path: &str) -> Option<&NodeReport> {
        self.nodes.iter().find(|node| node.path.join(" ") == path)
    }
}
