//! Subcommand extraction.
//!
//! Tracks entry into and exit from "commands" sections in one linear pass.
//! Inside a section the first entry calibrates the entry indentation and
//! anything indented deeper is treated as description text.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::classify::{
    LineKind, SUBCOMMAND_LINE_RE, SUBCOMMAND_NAME_RE, TWO_SPACES_RE, classify_line, indent_of,
    is_reserved_word,
};

/// How aggressively subcommand entries are detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionMode {
    /// Only lines inside a recognized commands section count. Used for man
    /// pages, where prose is often indented like a listing.
    Strict,
    /// Also accepts `  name   description` lines outside any section. Used for
    /// `--help` output.
    Heuristic,
}

/// A subcommand name with the description found next to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubcommandEntry {
    pub name: String,
    /// May be empty when the listing has no description.
    pub description: String,
}

#[derive(Debug, Default)]
struct SectionState {
    inside: bool,
    entry_indent: Option<usize>,
}

impl SectionState {
    fn enter(&mut self) {
        self.inside = true;
        self.entry_indent = None;
    }

    fn leave(&mut self) {
        self.inside = false;
        self.entry_indent = None;
    }
}

/// Extracts subcommand entries in listing order.
///
/// Reserved words (`help`, `version`, `completion`) and names already seen
/// (case-sensitive) are skipped.
///
/// # Examples
///
/// ```
/// use autocompletor_discovery::parser::{DetectionMode, extract_subcommands};
///
/// let lines = [
///     "COMMANDS:",
///     "  dir   Directory enumeration mode",
///     "  dns   DNS subdomain enumeration",
/// ];
/// let entries = extract_subcommands(&lines, DetectionMode::Strict);
/// assert_eq!(entries.len(), 2);
/// assert_eq!(entries[0].name, "dir");
/// assert_eq!(entries[1].description, "DNS subdomain enumeration");
/// ```
pub fn extract_subcommands(lines: &[&str], mode: DetectionMode) -> Vec<SubcommandEntry> {
    let mut entries = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut section = SectionState::default();

    for (i, line) in lines.iter().enumerate() {
        let kind = classify_line(line);

        if kind == LineKind::SectionHeader {
            section.enter();
            continue;
        }
        if section.inside && !line.is_empty() && !line.starts_with([' ', '\t']) {
            section.leave();
        }

        if !section.inside && (mode == DetectionMode::Strict || kind != LineKind::Subcommand) {
            continue;
        }
        if kind == LineKind::Blank {
            continue;
        }

        let line_indent = indent_of(line);

        if !section.inside {
            let Some(caps) = SUBCOMMAND_LINE_RE.captures(line) else {
                continue;
            };
            let name = caps.get(1).map_or("", |m| m.as_str());
            let description = caps.get(2).map_or("", |m| m.as_str().trim());
            if is_reserved_word(name) || !seen.insert(name.to_string()) {
                continue;
            }
            entries.push(SubcommandEntry {
                name: name.to_string(),
                description: description.to_string(),
            });
            continue;
        }

        let entry_indent = *section.entry_indent.get_or_insert(line_indent);
        if line_indent > entry_indent {
            continue;
        }

        let trimmed = line.trim();
        let mut parts = TWO_SPACES_RE.splitn(trimmed, 2);
        let head = parts.next().unwrap_or_default();
        let inline_description = parts.next().map(str::trim).unwrap_or_default();
        let name = head.split_whitespace().next().unwrap_or_default();

        if !SUBCOMMAND_NAME_RE.is_match(name) || is_reserved_word(name) || seen.contains(name) {
            continue;
        }
        seen.insert(name.to_string());

        let description = if inline_description.is_empty() {
            lines
                .get(i + 1)
                .and_then(|next| next_line_description(next, line_indent))
                .unwrap_or_default()
        } else {
            inline_description.to_string()
        };

        entries.push(SubcommandEntry {
            name: name.to_string(),
            description,
        });
    }

    entries
}

/// Uses a more-indented following line as the description, cut after the
/// first sentence.
fn next_line_description(next: &str, entry_indent: usize) -> Option<String> {
    let trimmed = next.trim();
    if trimmed.is_empty() || trimmed.starts_with('-') || indent_of(next) <= entry_indent {
        return None;
    }
    let sentence = match trimmed.find(". ") {
        Some(idx) => &trimmed[..=idx],
        None => trimmed,
    };
    Some(sentence.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(entries: &[SubcommandEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_strict_mode_ignores_lines_outside_sections() {
        let lines = [
            "Usage: tool <command>",
            "  run    Looks like an entry but is outside a section",
        ];
        assert!(extract_subcommands(&lines, DetectionMode::Strict).is_empty());
        assert_eq!(
            names(&extract_subcommands(&lines, DetectionMode::Heuristic)),
            vec!["run"]
        );
    }

    #[test]
    fn test_section_ends_at_unindented_line() {
        let lines = [
            "Commands:",
            "  build   Compile the project",
            "Options:",
            "  check   not a command, section closed",
        ];
        assert_eq!(
            names(&extract_subcommands(&lines, DetectionMode::Strict)),
            vec!["build"]
        );
    }

    #[test]
    fn test_entry_indent_calibration_skips_deeper_lines() {
        let lines = [
            "COMMANDS",
            "       clone <url>",
            "              Clone a repository. Also sets up remotes.",
            "       fetch",
            "              Download objects",
            "              and refs",
        ];
        let entries = extract_subcommands(&lines, DetectionMode::Strict);
        assert_eq!(names(&entries), vec!["clone", "fetch"]);
        assert_eq!(entries[0].description, "Clone a repository.");
        assert_eq!(entries[1].description, "Download objects");
    }

    #[test]
    fn test_reserved_and_duplicate_names_are_skipped() {
        let lines = [
            "Available Commands:",
            "  completion  Generate the autocompletion script",
            "  help        Help about any command",
            "  serve       Start the server",
            "  version     Print the version",
            "  serve       Listed twice",
        ];
        let entries = extract_subcommands(&lines, DetectionMode::Heuristic);
        assert_eq!(names(&entries), vec!["serve"]);
        assert_eq!(entries[0].description, "Start the server");
    }

    #[test]
    fn test_next_line_description_must_not_be_a_flag() {
        let lines = ["SUBCOMMANDS", "    push", "        --force overwrite remote"];
        let entries = extract_subcommands(&lines, DetectionMode::Strict);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].description, "");
    }

    #[test]
    fn test_blank_lines_keep_section_open() {
        let lines = ["commands:", "", "  init   Create a repo", "", "  add    Stage files"];
        assert_eq!(
            names(&extract_subcommands(&lines, DetectionMode::Strict)),
            vec!["init", "add"]
        );
    }
}
