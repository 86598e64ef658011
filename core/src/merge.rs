//! First-seen merging of flags and subcommands.
//!
//! Results for the same command can come from several sources (man page,
//! `--help`, `-h`, an AI reply). Merging never replaces anything that is
//! already present: entries are appended only when their identity key is
//! missing, so discovery order is preserved.
//!
//! # Example
//!
//! ```
//! use autocompletor_core::*;
//!
//! let mut from_man = vec![Command::new("dir"), Command::new("dns")];
//! let from_help = vec![Command::new("dns"), Command::new("vhost")];
//!
//! let added = merge_subcommands(&mut from_man, from_help);
//! assert_eq!(added, 1);
//! let names: Vec<_> = from_man.iter().map(|c| c.name.as_str()).collect();
//! assert_eq!(names, vec!["dir", "dns", "vhost"]);
//! ```

use std::collections::HashSet;

use crate::{Command, Flag};

/// Appends `flag` unless a flag with the same [`Flag::key`] is present.
///
/// Returns `true` when the flag was appended.
pub fn push_flag(flags: &mut Vec<Flag>, flag: Flag) -> bool {
    if flags.iter().any(|existing| existing.key() == flag.key()) {
        return false;
    }
    flags.push(flag);
    true
}

/// Appends every flag from `extra` whose key is not already in `base`.
///
/// Returns the number of flags appended.
///
/// # Examples
///
/// ```
/// use autocompletor_core::*;
///
/// let mut flags = vec![Flag::new(Some("-v"), Some("--verbose"))];
/// let added = merge_flags(
///     &mut flags,
///     vec![
///         Flag::new(None, Some("--verbose")).with_description("ignored"),
///         Flag::new(Some("-q"), None),
///     ],
/// );
/// assert_eq!(added, 1);
/// assert_eq!(flags[0].description, "");
/// assert_eq!(flags[1].key(), "-q");
/// ```
pub fn merge_flags(base: &mut Vec<Flag>, extra: impl IntoIterator<Item = Flag>) -> usize {
    let mut seen: HashSet<String> = base.iter().map(|f| f.key().to_string()).collect();
    let mut added = 0;

    for flag in extra {
        if seen.insert(flag.key().to_string()) {
            base.push(flag);
            added += 1;
        }
    }

    added
}

/// Appends every subcommand from `extra` whose name is not already in `base`.
///
/// Names are compared exactly (case-sensitive). Existing entries keep all of
/// their fields. Returns the number of subcommands appended.
pub fn merge_subcommands(base: &mut Vec<Command>, extra: impl IntoIterator<Item = Command>) -> usize {
    let mut seen: HashSet<String> = base.iter().map(|c| c.name.clone()).collect();
    let mut added = 0;

    for sub in extra {
        if seen.insert(sub.name.clone()) {
            base.push(sub);
            added += 1;
        }
    }

    added
}

/// Fills gaps in `target` from `source` without overwriting.
///
/// Missing flags are appended and the description is taken from `source`
/// only when `target` has none. Subcommands are left untouched.
///
/// # Examples
///
/// ```
/// use autocompletor_core::*;
///
/// let mut from_man = Command::new("dir").with_description("Directory mode");
/// let mut from_help = Command::new("dir").with_description("Uses directory mode");
/// from_help.flags.push(Flag::new(Some("-w"), Some("--wordlist")).taking_arg());
///
/// backfill(&mut from_man, from_help);
/// assert_eq!(from_man.description.as_deref(), Some("Directory mode"));
/// assert_eq!(from_man.flags.len(), 1);
/// ```
pub fn backfill(target: &mut Command, source: Command) {
    merge_flags(&mut target.flags, source.flags);
    if target.description.is_none() {
        target.description = source.description;
    }
}
