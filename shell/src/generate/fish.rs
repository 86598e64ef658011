use autocompletor_core::{Command, Flag};

use super::{Node, nodes};

pub(super) fn render(tree: &Command) -> String {
    let program = quote(&tree.name);
    let mut out = String::new();
    out.push_str(&format!(
        "# fish completion for {}, generated by autocompletor\n",
        tree.name
    ));

    for node in nodes(tree) {
        out.push('\n');
        let seen = seen_condition(&node);

        if !node.command.subcommands.is_empty() {
            let listing = if node.is_root() {
                "__fish_use_subcommand".to_string()
            } else {
                let children = node
                    .command
                    .subcommands
                    .iter()
                    .map(|sub| sub.name.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                format!("{seen}; and not __fish_seen_subcommand_from {children}")
            };
            for sub in &node.command.subcommands {
                out.push_str(&format!(
                    "complete -c {program} -f -n '{}' -a '{}'",
                    quote(&listing),
                    quote(&sub.name)
                ));
                if let Some(desc) = &sub.description {
                    out.push_str(&format!(" -d '{}'", quote(desc)));
                }
                out.push('\n');
            }
        }

        for flag in &node.command.flags {
            out.push_str(&format!("complete -c {program}"));
            if !seen.is_empty() {
                out.push_str(&format!(" -n '{}'", quote(&seen)));
            }
            out.push_str(&flag_options(flag));
            out.push('\n');
        }
    }
    out
}

/// `__fish_seen_subcommand_from` for every name on the node's path.
fn seen_condition(node: &Node<'_>) -> String {
    node.path
        .iter()
        .map(|name| format!("__fish_seen_subcommand_from {name}"))
        .collect::<Vec<_>>()
        .join("; and ")
}

fn flag_options(flag: &Flag) -> String {
    let mut opts = String::new();
    if let Some(short) = flag.short.as_deref().and_then(|s| s.strip_prefix('-')) {
        if short.chars().count() == 1 {
            opts.push_str(&format!(" -s {}", quote(short)));
        } else {
            opts.push_str(&format!(" -o {}", quote(short)));
        }
    }
    if let Some(long) = flag.long.as_deref().and_then(|l| l.strip_prefix("--")) {
        opts.push_str(&format!(" -l {}", quote(long)));
    }
    if flag.takes_arg {
        opts.push_str(" -r");
    }
    if !flag.description.is_empty() {
        opts.push_str(&format!(" -d '{}'", quote(&flag.description)));
    }
    opts
}

/// Escapes text for a single-quoted fish string.
fn quote(text: &str) -> String {
    text.replace('\\', "\\\\").replace('\'', "\\'")
}
