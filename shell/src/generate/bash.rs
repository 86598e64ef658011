use std::collections::BTreeSet;

use autocompletor_core::Command;

use super::{flag_words, function_name, is_plain_word, nodes};

pub(super) fn render(tree: &Command) -> String {
    let func = format!("_{}_completions", function_name(&tree.name));
    let flat = nodes(tree);
    let mut out = String::new();

    out.push_str(&format!(
        "# bash completion for {}, generated by autocompletor\n\n",
        tree.name
    ));
    out.push_str(&format!("{func}() {{\n"));
    out.push_str("    local cur prev node word i opts\n");
    out.push_str("    cur=\"${COMP_WORDS[COMP_CWORD]}\"\n");
    out.push_str("    prev=\"${COMP_WORDS[COMP_CWORD-1]}\"\n");
    out.push_str("    node=\"\"\n");

    let arg_flags = flat
        .iter()
        .flat_map(|node| &node.command.flags)
        .filter(|flag| flag.takes_arg)
        .flat_map(flag_words)
        .filter(|word| is_plain_word(word))
        .collect::<BTreeSet<_>>();
    if !arg_flags.is_empty() {
        let pattern = arg_flags.into_iter().collect::<Vec<_>>().join("|");
        out.push_str("\n    case \"${prev}\" in\n");
        out.push_str(&format!("        {pattern})\n"));
        out.push_str("            COMPREPLY=($(compgen -f -- \"${cur}\"))\n");
        out.push_str("            return 0\n");
        out.push_str("            ;;\n");
        out.push_str("    esac\n");
    }

    let transitions = flat
        .iter()
        .filter(|node| !node.is_root())
        .map(|node| format!("\"{}:{}\"", escape(&node.parent_key()), escape(&node.command.name)))
        .collect::<Vec<_>>();
    if !transitions.is_empty() {
        out.push_str("\n    for ((i = 1; i < COMP_CWORD; i++)); do\n");
        out.push_str("        word=\"${COMP_WORDS[i]}\"\n");
        out.push_str("        case \"${node}:${word}\" in\n");
        out.push_str(&format!("            {})\n", transitions.join("|")));
        out.push_str("                node=\"${node:+${node} }${word}\"\n");
        out.push_str("                ;;\n");
        out.push_str("        esac\n");
        out.push_str("    done\n");
    }

    out.push_str("\n    case \"${node}\" in\n");
    for node in &flat {
        let words = node
            .command
            .subcommands
            .iter()
            .map(|sub| sub.name.as_str())
            .chain(node.command.flags.iter().flat_map(flag_words))
            .filter(|word| is_plain_word(word))
            .map(escape)
            .collect::<Vec<_>>();
        out.push_str(&format!("        \"{}\")\n", escape(&node.key())));
        out.push_str(&format!("            opts=\"{}\"\n", words.join(" ")));
        out.push_str("            ;;\n");
    }
    out.push_str("    esac\n\n");
    out.push_str("    COMPREPLY=($(compgen -W \"${opts}\" -- \"${cur}\"))\n");
    out.push_str("}\n\n");
    out.push_str(&format!("complete -F {func} {}\n", tree.name));
    out
}

/// Escapes text for a double-quoted bash string.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '\\' | '"' | '$' | '`') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
