//! Property tests for the flag and subcommand extractors.
//!
//! Blocks are built from realistic line shapes (flag lines, flag-only lines,
//! wrapped descriptions, deep continuations, headers and listings) in any
//! order, so every combination of neighbours is exercised.

use std::collections::HashSet;

use autocompletor_discovery::parser::{
    DetectionMode, extract_flags, extract_subcommands, is_reserved_word, join_lines,
};
use proptest::prelude::*;

fn indent(width: usize) -> String {
    " ".repeat(width)
}

/// `-x`, `--name` or `-x, --name`, optionally prefixed by a `-#,` alias.
fn flag_tokens() -> impl Strategy<Value = String> {
    let short = "[a-zA-Z0-9]";
    let long = "[a-z][a-z0-9-]{0,10}";
    let tokens = prop_oneof![
        short.prop_map(|s| format!("-{s}")),
        long.prop_map(|l| format!("--{l}")),
        (short, long).prop_map(|(s, l)| format!("-{s}, --{l}")),
    ];
    (any::<bool>(), tokens).prop_map(|(alias, tokens)| {
        if alias {
            format!("-#, {tokens}")
        } else {
            tokens
        }
    })
}

/// An operand with the punctuation real man pages use around values.
fn operand() -> impl Strategy<Value = Option<String>> {
    proptest::option::of(r"[a-z_:#/*{},.|()<>=\[\]]{1,12}")
}

fn words(max: usize) -> impl Strategy<Value = String> {
    prop::collection::vec("[A-Za-z][a-z]{1,8}", 1..max).prop_map(|words| words.join(" "))
}

fn flags_part() -> impl Strategy<Value = String> {
    (flag_tokens(), operand()).prop_map(|(tokens, operand)| match operand {
        Some(operand) => format!("{tokens} {operand}"),
        None => tokens,
    })
}

fn flag_line() -> impl Strategy<Value = String> {
    (2..=8usize, flags_part(), 2..=6usize, words(6))
        .prop_map(|(width, flags, gap, desc)| format!("{}{flags}{}{desc}", indent(width), indent(gap)))
}

fn flag_only_line() -> impl Strategy<Value = String> {
    (1..=12usize, flags_part()).prop_map(|(width, flags)| format!("{}{flags}", indent(width)))
}

fn description_line() -> impl Strategy<Value = String> {
    (13..=19usize, words(6)).prop_map(|(width, desc)| format!("{}{desc}", indent(width)))
}

fn deep_line() -> impl Strategy<Value = String> {
    (20..=28usize, any::<bool>(), words(6)).prop_map(|(width, dashed, text)| {
        if dashed {
            format!("{}-1 {text}", indent(width))
        } else {
            format!("{}{text}", indent(width))
        }
    })
}

fn header_line() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("COMMANDS:".to_string()),
        Just("Available Commands:".to_string()),
        Just("  SUBCOMMANDS".to_string()),
        Just("Options:".to_string()),
    ]
}

fn subcommand_line() -> impl Strategy<Value = String> {
    let name = prop_oneof![
        Just("help".to_string()),
        Just("version".to_string()),
        Just("completion".to_string()),
        "[a-z][a-z0-9_-]{0,8}",
    ];
    (2..=4usize, name, 2..=5usize, words(5))
        .prop_map(|(width, name, gap, desc)| format!("{}{name}{}{desc}", indent(width), indent(gap)))
}

fn any_line() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => flag_line(),
        3 => flag_only_line(),
        2 => description_line(),
        2 => deep_line(),
        1 => header_line(),
        3 => subcommand_line(),
        1 => Just(String::new()),
        1 => words(6),
    ]
}

fn block() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(any_line(), 0..40)
}

fn as_refs(lines: &[String]) -> Vec<&str> {
    lines.iter().map(String::as_str).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn test_flag_extraction_is_idempotent_on_joined_lines(lines in block()) {
        let lines = as_refs(&lines);
        let joined = join_lines(&lines);

        prop_assert_eq!(extract_flags(&as_refs(&joined)), extract_flags(&lines));
    }

    #[test]
    fn test_flag_keys_are_unique(lines in block()) {
        let flags = extract_flags(&as_refs(&lines));
        let keys = flags.iter().map(|flag| flag.key()).collect::<HashSet<_>>();

        prop_assert_eq!(keys.len(), flags.len());
        prop_assert!(flags.iter().all(|flag| flag.short.is_some() || flag.long.is_some()));
    }

    #[test]
    fn test_subcommands_never_include_reserved_words(lines in block()) {
        let lines = as_refs(&lines);
        for mode in [DetectionMode::Strict, DetectionMode::Heuristic] {
            let entries = extract_subcommands(&lines, mode);
            prop_assert!(
                entries.iter().all(|entry| !is_reserved_word(&entry.name)),
                "reserved name in {:?}",
                entries
            );
            let names = entries.iter().map(|entry| entry.name.as_str()).collect::<HashSet<_>>();
            prop_assert_eq!(names.len(), entries.len());
        }
    }

    #[test]
    fn test_flag_only_line_with_deeper_description_yields_one_flag(
        width in 1..=12usize,
        flags in flags_part(),
        extra in 1..=8usize,
        desc in words(6),
    ) {
        let flag_line = format!("{}{flags}", indent(width));
        let desc_line = format!("{}{desc}", indent(width + extra));

        let extracted = extract_flags(&[flag_line.as_str(), desc_line.as_str()]);
        prop_assert_eq!(extracted.len(), 1);
        prop_assert_eq!(&extracted[0].description, &desc);
    }
}
