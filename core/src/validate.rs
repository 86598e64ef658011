//! Command tree validation.
//!
//! Checks the structural invariants of a [`Command`] tree: every flag has a
//! well-formed short or long form, flag keys and subcommand names are unique
//! per scope, names are non-empty, and the tree is no deeper than the limit.
//!
//! Trees built by the extraction engine satisfy these by construction; the
//! check matters for trees parsed from AI replies or loaded from disk.
//!
//! # Examples
//!
//! ```
//! use autocompletor_core::*;
//!
//! let mut cmd = Command::new("gobuster");
//! cmd.flags.push(Flag::new(Some("-u"), Some("--url")));
//! assert!(validate_tree(&cmd, DEFAULT_MAX_DEPTH).is_empty());
//!
//! // Invalid: short flag missing leading dash
//! let mut bad = Command::new("gobuster");
//! bad.flags.push(Flag::new(Some("u"), None));
//! assert!(!validate_tree(&bad, DEFAULT_MAX_DEPTH).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{Command, Flag};

/// Tree validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Command or subcommand name is empty or whitespace-only.
    #[error("command name cannot be empty (at: {0})")]
    EmptyCommandName(String),
    /// A flag has neither short nor long form.
    #[error("flag must define short or long form (at: {0})")]
    MissingFlagName(String),
    /// Short flag is not a single dash plus one character (e.g. `"v"`).
    #[error("invalid short flag format: {0}")]
    InvalidShortFlag(String),
    /// Long flag does not start with `--` or is too short.
    #[error("invalid long flag format: {0}")]
    InvalidLongFlag(String),
    /// Two flags in the same scope share an identity key.
    #[error("duplicate flag in scope: {0}")]
    DuplicateFlag(String),
    /// Two subcommands in the same scope share a name.
    #[error("duplicate subcommand in scope: {0}")]
    DuplicateSubcommand(String),
    /// A subcommand sits deeper than the allowed number of levels.
    #[error("subcommand exceeds maximum depth {max}: {path}")]
    DepthExceeded { path: String, max: usize },
}

/// Validates a whole tree, collecting every problem found.
///
/// `max_depth` counts subcommand levels below the root.
pub fn validate_tree(root: &Command, max_depth: usize) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut path = Vec::new();
    validate_node(root, 0, max_depth, &mut path, &mut errors);
    errors
}

fn validate_node(
    node: &Command,
    depth: usize,
    max_depth: usize,
    path: &mut Vec<String>,
    errors: &mut Vec<ValidationError>,
) {
    path.push(node.name.clone());
    let here = path.join(" ");

    if node.name.trim().is_empty() {
        errors.push(ValidationError::EmptyCommandName(here.clone()));
    }

    if depth > max_depth {
        errors.push(ValidationError::DepthExceeded {
            path: here,
            max: max_depth,
        });
        path.pop();
        return;
    }

    errors.extend(validate_flags(&node.flags, &here));

    let mut seen: HashSet<&str> = HashSet::new();
    for sub in &node.subcommands {
        if !seen.insert(sub.name.as_str()) {
            errors.push(ValidationError::DuplicateSubcommand(format!(
                "{here} {}",
                sub.name
            )));
            continue;
        }
        validate_node(sub, depth + 1, max_depth, path, errors);
    }

    path.pop();
}

fn validate_flags(flags: &[Flag], scope: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for flag in flags {
        if flag.short.is_none() && flag.long.is_none() {
            errors.push(ValidationError::MissingFlagName(scope.to_string()));
            continue;
        }

        if let Some(short) = &flag.short {
            if !is_short_form(short) {
                errors.push(ValidationError::InvalidShortFlag(short.clone()));
            }
        }

        if let Some(long) = &flag.long {
            if !long.starts_with("--") || long.len() < 3 {
                errors.push(ValidationError::InvalidLongFlag(long.clone()));
            }
        }

        if !seen.insert(flag.key()) {
            errors.push(ValidationError::DuplicateFlag(flag.key().to_string()));
        }
    }

    errors
}

fn is_short_form(short: &str) -> bool {
    let mut chars = short.chars();
    chars.next() == Some('-')
        && chars.next().is_some_and(|c| c != '-')
        && chars.next().is_none()
}
