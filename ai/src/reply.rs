//! Parsing of line-oriented model replies.

use autocompletor_core::{Command, Flag, merge_subcommands, push_flag};
use tracing::debug;

/// Builds a one-level tree from a model reply.
///
/// Only `FLAG|short|long|description|takes_arg` (exactly five fields) and
/// `SUBCOMMAND|name|description` (exactly three fields) lines are read;
/// prose, code fences and malformed records are skipped. Flags and
/// subcommands are deduplicated like parsed help output.
///
/// # Examples
///
/// ```
/// use autocompletor_ai::parse_reply;
///
/// let reply = "Sure! Here you go:\nFLAG|-u|--url|The target URL|true\nSUBCOMMAND|dir|Directory mode\n";
/// let tree = parse_reply("gobuster", reply);
/// assert!(tree.find_flag("--url").is_some_and(|f| f.takes_arg));
/// assert_eq!(tree.subcommand_names(), vec!["dir"]);
/// ```
pub fn parse_reply(program: &str, reply: &str) -> Command {
    let mut root = Command::new(program);
    let mut skipped = 0usize;

    for line in reply.lines().map(str::trim) {
        let fields = line.split('|').collect::<Vec<_>>();
        match fields.as_slice() {
            ["FLAG", short, long, description, takes_arg] => {
                let short = Some(short.trim()).filter(|s| !s.is_empty());
                let long = Some(long.trim()).filter(|s| !s.is_empty());
                if short.is_none() && long.is_none() {
                    skipped += 1;
                    continue;
                }
                let mut flag = Flag::new(short, long).with_description(description.trim());
                flag.takes_arg = takes_arg.trim().eq_ignore_ascii_case("true");
                push_flag(&mut root.flags, flag);
            }
            ["SUBCOMMAND", name, description] => {
                let name = name.trim();
                if name.is_empty() {
                    skipped += 1;
                    continue;
                }
                let sub = Command::new(name).with_description(description);
                merge_subcommands(&mut root.subcommands, [sub]);
            }
            _ if line.starts_with("FLAG|") || line.starts_with("SUBCOMMAND|") => skipped += 1,
            _ => {}
        }
    }

    debug!(
        program,
        flags = root.flags.len(),
        subcommands = root.subcommands.len(),
        skipped,
        "Parsed AI reply"
    );
    root
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reply_reads_flags_and_subcommands() {
        let reply = "\
FLAG|-u|--url|The target URL|true
FLAG|-v||Enable verbose output|false
FLAG||--no-color|Disable colors|FALSE
SUBCOMMAND|dir|Directory enumeration mode
SUBCOMMAND|dns|DNS subdomain enumeration mode
";
        let tree = parse_reply("gobuster", reply);
        assert_eq!(tree.name, "gobuster");
        assert_eq!(tree.flags.len(), 3);

        let url = tree.find_flag("-u").unwrap();
        assert_eq!(url.long.as_deref(), Some("--url"));
        assert_eq!(url.description, "The target URL");
        assert!(url.takes_arg);

        let verbose = tree.find_flag("-v").unwrap();
        assert!(verbose.long.is_none());
        assert!(!verbose.takes_arg);

        assert_eq!(tree.subcommand_names(), vec!["dir", "dns"]);
        assert_eq!(
            tree.subcommands[1].description.as_deref(),
            Some("DNS subdomain enumeration mode")
        );
    }

    #[test]
    fn test_parse_reply_ignores_malformed_lines() {
        let reply = "\
Here are the completions:
```
FLAG|-u|--url|The target URL
FLAG|-u|--url|The target URL|true|extra
SUBCOMMAND|dir
SUBCOMMAND|dir|desc|extra
FLAG|||no names|true
flag|-x|--lower|lowercase tag|true
SUBCOMMAND||empty name
```
";
        let tree = parse_reply("tool", reply);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_parse_reply_deduplicates() {
        let reply = "\
FLAG|-t|--threads|Threads|true
FLAG|-t|--threads|Threads again|false
SUBCOMMAND|dir|First
SUBCOMMAND|dir|Second
";
        let tree = parse_reply("tool", reply);
        assert_eq!(tree.flags.len(), 1);
        assert_eq!(tree.flags[0].description, "Threads");
        assert_eq!(tree.subcommands.len(), 1);
        assert_eq!(tree.subcommands[0].description.as_deref(), Some("First"));
    }

    #[test]
    fn test_parse_reply_trims_indented_records() {
        let tree = parse_reply("tool", "   SUBCOMMAND|run|Run it   \r\n");
        assert_eq!(tree.subcommand_names(), vec!["run"]);
        assert_eq!(tree.subcommands[0].description.as_deref(), Some("Run it"));
    }
}
