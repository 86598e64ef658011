//! Flag extraction.

use autocompletor_core::{Flag, push_flag};

use super::classify::{FLAG_LINE_RE, LONG_FLAG_RE, SHORT_FLAG_RE, TAKES_ARG_RE};
use super::join::join_lines;

/// Extracts flags from help or man page lines.
///
/// Runs the join pass first, then parses every joined line. The first
/// occurrence of each identity key wins and discovery order is preserved.
///
/// # Examples
///
/// ```
/// use autocompletor_discovery::parser::extract_flags;
///
/// let lines = [
///     "Options:",
///     "  -u, --url <URL>    Target URL to scan",
///     "  -v, --verbose      Verbose output",
///     "      --url string   duplicate, dropped",
/// ];
/// let flags = extract_flags(&lines);
/// assert_eq!(flags.len(), 2);
/// assert_eq!(flags[0].short.as_deref(), Some("-u"));
/// assert_eq!(flags[0].long.as_deref(), Some("--url"));
/// assert!(flags[0].takes_arg);
/// assert!(!flags[1].takes_arg);
/// ```
pub fn extract_flags(lines: &[&str]) -> Vec<Flag> {
    let mut flags = Vec::new();
    for line in join_lines(lines) {
        if let Some(flag) = parse_flag_line(&line) {
            push_flag(&mut flags, flag);
        }
    }
    flags
}

/// Parses a single (already joined) flag line.
///
/// The line must be indented, contain a flags part starting with a dash, a
/// separator of two or more spaces or a tab, and a description. The first
/// long token becomes `long`, the first short token becomes `short`.
pub fn parse_flag_line(line: &str) -> Option<Flag> {
    if !line.starts_with([' ', '\t']) {
        return None;
    }

    let caps = FLAG_LINE_RE.captures(line)?;
    let flags_part = caps.get(1)?.as_str();
    let description = caps.get(2)?.as_str().trim();

    if !flags_part.contains('-') {
        return None;
    }

    let long = LONG_FLAG_RE
        .captures(flags_part)
        .and_then(|c| c.get(1))
        .map(|m| format!("--{}", m.as_str()));
    let short = SHORT_FLAG_RE
        .captures(flags_part)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());

    if long.is_none() && short.is_none() {
        return None;
    }

    Some(Flag {
        short,
        long,
        description: description.to_string(),
        takes_arg: TAKES_ARG_RE.is_match(flags_part),
    })
}
