//! Completion script generators.
//!
//! Every generator walks the same flattened view of the tree: one [`Node`]
//! per command, keyed by the space-joined subcommand path below the root
//! (the root's key is empty). The scripts track that key at completion time
//! by replaying the words already on the command line.

mod bash;
mod fish;
mod zsh;

use autocompletor_core::{Command, Flag};

use crate::shell::Shell;

/// Renders a completion script for `tree` in the syntax of `shell`.
///
/// # Examples
///
/// ```
/// use autocompletor_core::{Command, Flag};
/// use autocompletor_shell::{Shell, generate};
///
/// let mut tree = Command::new("gobuster");
/// tree.flags.push(Flag::new(Some("-t"), Some("--threads")).taking_arg());
/// tree.subcommands.push(Command::new("dir").with_description("Directory mode"));
///
/// let script = generate(Shell::Fish, &tree);
/// assert!(script.contains("-a 'dir' -d 'Directory mode'"));
/// assert!(script.contains("-s t -l threads -r"));
/// ```
pub fn generate(shell: Shell, tree: &Command) -> String {
    match shell {
        Shell::Fish => fish::render(tree),
        Shell::Bash => bash::render(tree),
        Shell::Zsh => zsh::render(tree),
    }
}

/// A command together with its position in the tree.
pub(crate) struct Node<'a> {
    /// Subcommand names below the root.
    pub path: Vec<&'a str>,
    pub command: &'a Command,
}

impl Node<'_> {
    pub fn key(&self) -> String {
        self.path.join(" ")
    }

    pub fn parent_key(&self) -> String {
        self.path[..self.path.len().saturating_sub(1)].join(" ")
    }

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }
}

/// Flattens the tree in pre-order.
pub(crate) fn nodes(tree: &Command) -> Vec<Node<'_>> {
    let mut out = Vec::new();
    tree.walk(&mut |path, command| {
        out.push(Node {
            path: path[1..].to_vec(),
            command,
        });
    });
    out
}

/// Shell function names may only contain word characters.
pub(crate) fn function_name(program: &str) -> String {
    program
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
        .collect()
}

/// Short and long spellings of a flag, short first.
pub(crate) fn flag_words(flag: &Flag) -> Vec<&str> {
    [flag.short.as_deref(), flag.long.as_deref()]
        .into_iter()
        .flatten()
        .collect()
}

/// Words containing whitespace cannot be offered as a single completion.
pub(crate) fn is_plain_word(word: &str) -> bool {
    !word.is_empty() && !word.chars().any(char::is_whitespace)
}
