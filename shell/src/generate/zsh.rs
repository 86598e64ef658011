use autocompletor_core::{Command, Flag};

use super::{function_name, is_plain_word, nodes};

pub(super) fn render(tree: &Command) -> String {
    let func = format!("_{}", function_name(&tree.name));
    let flat = nodes(tree);
    let mut out = String::new();

    out.push_str(&format!("#compdef {}\n", tree.name));
    out.push_str(&format!(
        "# zsh completion for {}, generated by autocompletor\n\n",
        tree.name
    ));
    out.push_str(&format!("{func}() {{\n"));
    out.push_str("    local node=\"\" word i\n");
    out.push_str("    local -a commands flags\n");

    let transitions = flat
        .iter()
        .filter(|node| !node.is_root())
        .map(|node| format!("'{}:{}'", quote(&node.parent_key()), quote(&node.command.name)))
        .collect::<Vec<_>>();
    if !transitions.is_empty() {
        out.push_str("\n    for ((i = 2; i < CURRENT; i++)); do\n");
        out.push_str("        word=\"${words[i]}\"\n");
        out.push_str("        case \"${node}:${word}\" in\n");
        out.push_str(&format!("            {})\n", transitions.join("|")));
        out.push_str("                node=\"${node:+${node} }${word}\"\n");
        out.push_str("                ;;\n");
        out.push_str("        esac\n");
        out.push_str("    done\n");
    }

    out.push_str("\n    case \"${node}\" in\n");
    for node in &flat {
        out.push_str(&format!("        '{}')\n", quote(&node.key())));

        out.push_str("            commands=(\n");
        for sub in &node.command.subcommands {
            let desc = sub.description.as_deref().unwrap_or_default();
            out.push_str(&format!(
                "                '{}:{}'\n",
                quote(&sub.name.replace(':', "\\:")),
                quote(desc)
            ));
        }
        out.push_str("            )\n");

        out.push_str("            flags=(\n");
        for flag in &node.command.flags {
            if let Some(spec) = flag_spec(flag) {
                out.push_str(&format!("                {spec}\n"));
            }
        }
        out.push_str("            )\n");
        out.push_str("            ;;\n");
    }
    out.push_str("    esac\n\n");

    out.push_str("    if [[ \"${words[CURRENT]}\" == -* ]] || (( ${#commands} == 0 )); then\n");
    out.push_str("        _arguments -s \"${flags[@]}\"\n");
    out.push_str("    else\n");
    out.push_str(&format!(
        "        _describe -t commands '{} command' commands\n",
        quote(&tree.name)
    ));
    out.push_str("    fi\n");
    out.push_str("}\n\n");

    out.push_str(&format!(
        "if [ \"$funcstack[1]\" = \"{func}\" ]; then\n    {func} \"$@\"\nelse\n    compdef {func} {}\nfi\n",
        tree.name
    ));
    out
}

/// An `_arguments` spec such as `'(-t --threads)'{-t,--threads}'[Threads]: :_default'`.
fn flag_spec(flag: &Flag) -> Option<String> {
    let mut tail = String::new();
    if !flag.description.is_empty() {
        tail.push_str(&format!("[{}]", quote(&bracket_escape(&flag.description))));
    }
    if flag.takes_arg {
        tail.push_str(": :_default");
    }

    let short = flag.short.as_deref().filter(|w| is_plain_word(w));
    let long = flag.long.as_deref().filter(|w| is_plain_word(w));
    match (short, long) {
        (Some(short), Some(long)) => Some(format!(
            "'({short} {long})'{{{short},{long}}}'{tail}'"
        )),
        (Some(word), None) | (None, Some(word)) => Some(format!("'{word}{tail}'")),
        (None, None) => None,
    }
}

fn bracket_escape(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('[', "\\[")
        .replace(']', "\\]")
}

/// Escapes text for a single-quoted zsh string.
fn quote(text: &str) -> String {
    text.replace('\'', "'\\''")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::tests::sample_tree;

    #[test]
    fn test_zsh_header_and_registration() {
        let script = render(&sample_tree());
        assert!(script.starts_with("#compdef gobuster\n"));
        assert!(script.contains("_gobuster() {\n"));
        assert!(script.contains("    compdef _gobuster gobuster\n"));
    }

    #[test]
    fn test_zsh_root_commands_and_flags() {
        let script = render(&sample_tree());
        assert!(script.contains("                'dir:Uses directory/file enumeration mode'\n"));
        assert!(script.contains(
            "                '(-t --threads)'{-t,--threads}'[Number of concurrent threads]: :_default'\n"
        ));
        assert!(script.contains("                '--no-color[Disable color output]'\n"));
        assert!(script.contains("            'dir:status'|"));
    }

    #[test]
    fn test_flag_spec_escapes_description() {
        let flag = Flag::new(Some("-q"), None).with_description("Don't print [headers]");
        assert_eq!(
            flag_spec(&flag).as_deref(),
            Some("'-q[Don'\\''t print \\[headers\\]]'")
        );
        assert_eq!(flag_spec(&Flag::new(None, None)), None);
    }
}
