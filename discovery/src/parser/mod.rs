//! Heuristic parser for man pages and `--help` output.
//!
//! Help text has no grammar, so the parser works line by line:
//!
//! 1. [`normalize_help_output`] strips terminal formatting.
//! 2. [`classify_line`] assigns each line a [`LineKind`].
//! 3. [`join_lines`] merges man-style "flag, then description below" entries
//!    and folds wrapped descriptions.
//! 4. [`extract_flags`] and [`extract_subcommands`] turn the lines into
//!    records; [`extract_summary`] and [`extract_man_summary`] find a
//!    one-line description.
//!
//! [`parse_help_output`] and [`parse_man_page`] run the whole pipeline for
//! one source.

mod classify;
mod flags;
mod join;
mod normalize;
mod subcommands;
mod summary;

use autocompletor_core::Flag;

pub use classify::{LineKind, classify_line, indent_of, is_commands_header, is_reserved_word};
pub use flags::{extract_flags, parse_flag_line};
pub use join::join_lines;
pub use normalize::{normalize_help_output, normalize_man_output};
pub use subcommands::{DetectionMode, SubcommandEntry, extract_subcommands};
pub use summary::{extract_man_summary, extract_summary};

/// Everything extracted from one source text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedHelp {
    pub flags: Vec<Flag>,
    pub subcommands: Vec<SubcommandEntry>,
    pub summary: Option<String>,
}

impl ParsedHelp {
    /// Returns `true` when neither flags nor subcommands were found.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty() && self.subcommands.is_empty()
    }
}

/// Parses `--help` / `-h` output with heuristic subcommand detection.
///
/// # Examples
///
/// ```
/// use autocompletor_discovery::parser::parse_help_output;
///
/// let help = "\
/// Usage: gobuster [command]
///
/// Available Commands:
///   dir         Uses directory/file enumeration mode
///   dns         Uses DNS subdomain enumeration mode
///   help        Help about any command
///
/// Flags:
///       --delay duration    Time each thread waits between requests
///   -t, --threads int       Number of concurrent threads (default 10)
/// ";
///
/// let parsed = parse_help_output(help);
/// assert_eq!(parsed.subcommands.len(), 2);
/// assert_eq!(parsed.flags.len(), 2);
/// assert!(parsed.flags[1].takes_arg);
/// ```
pub fn parse_help_output(raw: &str) -> ParsedHelp {
    let text = normalize_help_output(raw);
    let lines: Vec<&str> = text.lines().collect();

    ParsedHelp {
        flags: extract_flags(&lines),
        subcommands: extract_subcommands(&lines, DetectionMode::Heuristic),
        summary: extract_summary(&lines),
    }
}

/// Parses a rendered man page with strict subcommand detection.
pub fn parse_man_page(raw: &str) -> ParsedHelp {
    let text = normalize_man_output(raw);
    let lines: Vec<&str> = text.lines().collect();

    ParsedHelp {
        flags: extract_flags(&lines),
        subcommands: extract_subcommands(&lines, DetectionMode::Strict),
        summary: extract_man_summary(&lines),
    }
}
