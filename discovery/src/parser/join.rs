//! Joining of split flag entries.
//!
//! Man pages put the flag on one line and its description on the next, and
//! long descriptions wrap onto deeply indented lines. The join pass turns
//! both shapes back into single `flags    description` lines.

use super::classify::{LineKind, classify_line, indent_of};

/// Separator placed between a flag-only line and its adopted description.
const JOIN_SEPARATOR: &str = "    ";

/// Merges flag-only lines with their description line and folds deep
/// continuation lines into the previous output line.
///
/// # Examples
///
/// ```
/// use autocompletor_discovery::parser::join_lines;
///
/// let lines = [
///     "       -a, --all",
///     "              do not ignore entries starting with .",
/// ];
/// assert_eq!(
///     join_lines(&lines),
///     vec!["       -a, --all    do not ignore entries starting with ."]
/// );
/// ```
pub fn join_lines(lines: &[&str]) -> Vec<String> {
    let mut joined: Vec<String> = Vec::with_capacity(lines.len());
    // Set while the last pushed line is a flag-only line with no description.
    let mut awaiting_description = false;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let kind = classify_line(line);

        if kind == LineKind::DeepContinuation {
            if let Some(prev) = joined.last_mut().filter(|prev| !prev.trim().is_empty()) {
                if awaiting_description {
                    prev.truncate(prev.trim_end().len());
                    prev.push_str(JOIN_SEPARATOR);
                    awaiting_description = false;
                } else {
                    prev.push(' ');
                }
                prev.push_str(line.trim());
                i += 1;
                continue;
            }
        }

        if kind == LineKind::FlagOnly {
            if let Some(next) = lines.get(i + 1) {
                let next_trimmed = next.trim();
                if !next_trimmed.is_empty()
                    && !next_trimmed.starts_with('-')
                    && indent_of(next) > indent_of(line)
                {
                    joined.push(format!("{}{JOIN_SEPARATOR}{next_trimmed}", line.trim_end()));
                    awaiting_description = false;
                    i += 2;
                    continue;
                }
            }
        }

        awaiting_description = kind == LineKind::FlagOnly;
        joined.push(line.to_string());
        i += 1;
    }

    joined
}
