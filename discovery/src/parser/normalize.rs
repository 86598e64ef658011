//! Raw-output normalization.

use regex::Regex;
use std::sync::LazyLock;

const TAB_WIDTH: usize = 8;

/// Strips terminal formatting and unifies line endings.
///
/// Removes ANSI escape sequences and backspace overstrike pairs (the bold and
/// underline encoding `man` emits), converts CR/CRLF to LF and trims trailing
/// whitespace from every line. Leading indentation is preserved because the
/// classifiers depend on it.
pub fn normalize_help_output(raw: &str) -> String {
    // SAFETY: These regexes are compile-time constants and are validated by tests.
    static ANSI_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]").expect("static regex must compile")
    });
    static OVERSTRIKE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r".\x08").expect("static regex must compile"));

    let stripped = ANSI_RE.replace_all(raw, "");
    let mut cleaned = stripped.into_owned();
    while OVERSTRIKE_RE.is_match(&cleaned) {
        cleaned = OVERSTRIKE_RE.replace_all(&cleaned, "").into_owned();
    }
    let replaced = cleaned.replace("\r\n", "\n").replace('\r', "\n");

    replaced
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Normalizes rendered man page text.
///
/// Same as [`normalize_help_output`], plus tab expansion to 8-column stops so
/// man output is plain space-indented text.
pub fn normalize_man_output(raw: &str) -> String {
    normalize_help_output(raw)
        .lines()
        .map(expand_tabs)
        .collect::<Vec<_>>()
        .join("\n")
}

fn expand_tabs(line: &str) -> String {
    if !line.contains('\t') {
        return line.to_string();
    }
    let mut out = String::with_capacity(line.len() + TAB_WIDTH);
    let mut column = 0;
    for ch in line.chars() {
        if ch == '\t' {
            let pad = TAB_WIDTH - column % TAB_WIDTH;
            out.extend(std::iter::repeat_n(' ', pad));
            column += pad;
        } else {
            out.push(ch);
            column += 1;
        }
    }
    out
}
