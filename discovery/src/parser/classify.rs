//! Line-shape classification.
//!
//! Every help or man line falls into exactly one [`LineKind`]. The join pass
//! and both extractors decide what to do with a line from its kind and its
//! indentation, so the shapes live here in one place.

use regex::Regex;
use std::sync::LazyLock;

/// Lines indented at least this many spaces continue the previous entry.
pub(crate) const DEEP_CONTINUATION_INDENT: usize = 20;

/// Section headers may be indented at most this many columns.
const MAX_HEADER_INDENT: usize = 4;

/// Flag entries are indented between one and this many columns.
const MAX_FLAG_INDENT: usize = 12;

/// Subcommand names that are never reported.
const RESERVED_WORDS: &[&str] = &["help", "version", "completion"];

// SAFETY: These regexes are compile-time constants and are validated by tests.
pub(crate) static FLAG_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s{1,12}-[^\t]+?)(?:\s{2,}|\t)(.+)$").expect("static regex must compile")
});
pub(crate) static LONG_FLAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"--(?:\[no-\])?([a-zA-Z0-9][a-zA-Z0-9\-]*)").expect("static regex must compile")
});
pub(crate) static SHORT_FLAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[,\s])(-[a-zA-Z0-9])(?:[,\s]|$)").expect("static regex must compile")
});
pub(crate) static TAKES_ARG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(value|<[^>]+>|\[.*\]|file|path|string|int|num|port|url|host|addr|dir|name|key|secret|token)",
    )
    .expect("static regex must compile")
});
pub(crate) static SUBCOMMAND_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s{2,4}([a-z][a-zA-Z0-9_\-]*)\s{2,}(.+)$").expect("static regex must compile")
});
pub(crate) static SUBCOMMAND_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-zA-Z0-9_\-]*$").expect("static regex must compile"));
pub(crate) static TWO_SPACES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("static regex must compile"));

/// Shape of a single line, in classification priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Empty or whitespace-only.
    Blank,
    /// Introduces a block of subcommand listings ("COMMANDS", "Available Commands:").
    SectionHeader,
    /// Flags part, a 2+ space or tab separator, then a description.
    Flag,
    /// Flags with no description on the same line.
    FlagOnly,
    /// Deeply indented text that continues the previous entry.
    DeepContinuation,
    /// `name  description` at 2-4 columns of indentation.
    Subcommand,
    /// Anything else.
    Prose,
}

/// Number of leading spaces and tabs.
pub fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}

/// Classifies one line.
///
/// # Examples
///
/// ```
/// use autocompletor_discovery::parser::{LineKind, classify_line};
///
/// assert_eq!(classify_line("COMMANDS:"), LineKind::SectionHeader);
/// assert_eq!(classify_line("  -u, --url <URL>    Target URL"), LineKind::Flag);
/// assert_eq!(classify_line("       -v, --verbose"), LineKind::FlagOnly);
/// assert_eq!(classify_line("  dir   Directory enumeration mode"), LineKind::Subcommand);
/// assert_eq!(classify_line("Some prose."), LineKind::Prose);
/// ```
pub fn classify_line(line: &str) -> LineKind {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }

    let indent = indent_of(line);
    if indent <= MAX_HEADER_INDENT && is_commands_header(&trimmed.to_lowercase()) {
        return LineKind::SectionHeader;
    }

    if let Some(caps) = FLAG_LINE_RE.captures(line) {
        if caps.get(1).is_some_and(|m| has_flag_token(m.as_str())) {
            return LineKind::Flag;
        }
    } else if (1..=MAX_FLAG_INDENT).contains(&indent)
        && trimmed.starts_with('-')
        && has_flag_token(trimmed)
    {
        return LineKind::FlagOnly;
    }

    if line.len() > DEEP_CONTINUATION_INDENT
        && line.starts_with(&" ".repeat(DEEP_CONTINUATION_INDENT))
    {
        return LineKind::DeepContinuation;
    }

    if SUBCOMMAND_LINE_RE.is_match(line) {
        return LineKind::Subcommand;
    }

    LineKind::Prose
}

/// Returns `true` when the flags part yields at least one short or long token.
pub(crate) fn has_flag_token(flags_part: &str) -> bool {
    flags_part.contains('-')
        && (LONG_FLAG_RE.is_match(flags_part) || SHORT_FLAG_RE.is_match(flags_part))
}

/// Checks a trimmed, lower-cased line against the known header spellings.
///
/// Only the plural "commands" prefix is accepted so prose such as
/// "command. If --help ..." never opens a section.
pub fn is_commands_header(lower: &str) -> bool {
    matches!(
        lower,
        "commands"
            | "commands:"
            | "command:"
            | "subcommands"
            | "subcommands:"
            | "available commands:"
    ) || lower.starts_with("commands ")
}

/// Subcommand names that would only add noise to completions.
pub fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}
