//! One-line summaries for commands.

use regex::Regex;
use std::sync::LazyLock;

use super::classify::{LineKind, classify_line};

/// Only the top of the output is searched for a summary.
const SUMMARY_SCAN_LINES: usize = 10;

/// Finds a one-line description near the top of `--help` output.
///
/// Skips usage lines, section headers, flag rows, subcommand rows and
/// anything that looks like a synopsis.
///
/// # Examples
///
/// ```
/// use autocompletor_discovery::parser::extract_summary;
///
/// let lines = ["Usage: gobuster dir [flags]", "", "Uses directory/file enumeration mode"];
/// assert_eq!(
///     extract_summary(&lines).as_deref(),
///     Some("Uses directory/file enumeration mode")
/// );
/// ```
pub fn extract_summary(lines: &[&str]) -> Option<String> {
    for line in lines.iter().take(SUMMARY_SCAN_LINES) {
        let trimmed = line.trim();
        let lower = trimmed.to_lowercase();
        if trimmed.is_empty()
            || lower.starts_with("usage")
            || lower.starts_with("or:")
            || trimmed.ends_with(':')
            || trimmed.starts_with(['-', '[', '<'])
        {
            continue;
        }
        if matches!(
            classify_line(line),
            LineKind::Flag | LineKind::FlagOnly | LineKind::Subcommand | LineKind::SectionHeader
        ) {
            continue;
        }
        if trimmed.len() > 10
            && !trimmed.contains("--")
            && !trimmed.contains('[')
            && !trimmed.contains(']')
            && !trimmed.contains("...")
        {
            return sanitize(trimmed);
        }
    }
    None
}

/// Reads the `name - summary` line that follows the NAME header of a man page.
///
/// # Examples
///
/// ```
/// use autocompletor_discovery::parser::extract_man_summary;
///
/// let lines = ["LS(1)        User Commands        LS(1)", "", "NAME", "       ls - list directory contents"];
/// assert_eq!(extract_man_summary(&lines).as_deref(), Some("list directory contents"));
/// ```
pub fn extract_man_summary(lines: &[&str]) -> Option<String> {
    let header = lines.iter().position(|line| line.trim() == "NAME")?;
    let name_line = lines[header + 1..]
        .iter()
        .map(|line| line.trim())
        .find(|line| !line.is_empty())?;
    let (_, summary) = name_line.split_once(" - ")?;
    sanitize(summary)
}

fn sanitize(raw: &str) -> Option<String> {
    // SAFETY: These regexes are compile-time constants and are validated by tests.
    static MULTI_WS_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\s+").expect("static regex must compile"));

    let cleaned = MULTI_WS_RE.replace_all(raw.trim(), " ");
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.into_owned())
    }
}
