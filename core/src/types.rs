//! Command tree type definitions.
//!
//! This module defines the data model shared by the extraction engine, the
//! shell generators and the AI fallback. The types are designed for
//! serialization with [`serde`] so a tree can be dumped as JSON or YAML.

use serde::{Deserialize, Serialize};

/// Maximum number of subcommand levels below the root.
///
/// A [`Command`] deeper than this is never created by the tree builder.
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// One CLI option.
///
/// A flag has an optional short form (e.g., `-u`) and/or long form
/// (e.g., `--url`). At least one of the two is present.
///
/// # Examples
///
/// ```
/// use autocompletor_core::Flag;
///
/// let url = Flag::new(Some("-u"), Some("--url"))
///     .with_description("Target URL to scan")
///     .taking_arg();
/// assert_eq!(url.key(), "--url");
/// assert!(url.takes_arg);
///
/// let verbose = Flag::new(Some("-v"), None);
/// assert_eq!(verbose.key(), "-v");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flag {
    /// Short form (e.g. "-u")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    /// Long form (e.g. "--url")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long: Option<String>,
    /// Description from help text, may be empty
    #[serde(default)]
    pub description: String,
    /// Whether the flag consumes a following value
    #[serde(default)]
    pub takes_arg: bool,
}

impl Flag {
    /// Creates a flag without description that takes no value.
    pub fn new(short: Option<&str>, long: Option<&str>) -> Self {
        Self {
            short: short.map(String::from),
            long: long.map(String::from),
            description: String::new(),
            takes_arg: false,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = desc.to_string();
        self
    }

    /// Marks the flag as consuming a value.
    pub fn taking_arg(mut self) -> Self {
        self.takes_arg = true;
        self
    }

    /// Returns the identity key: the long form if present, else the short form.
    ///
    /// Two flags with the same key are the same flag.
    pub fn key(&self) -> &str {
        self.long
            .as_deref()
            .or(self.short.as_deref())
            .unwrap_or_default()
    }

    /// Checks if this flag matches a given string (short or long form).
    ///
    /// # Examples
    ///
    /// ```
    /// use autocompletor_core::Flag;
    ///
    /// let flag = Flag::new(Some("-u"), Some("--url"));
    /// assert!(flag.matches("-u"));
    /// assert!(flag.matches("--url"));
    /// assert!(!flag.matches("-x"));
    /// ```
    pub fn matches(&self, s: &str) -> bool {
        self.short.as_deref() == Some(s) || self.long.as_deref() == Some(s)
    }
}

/// The root program or one of its subcommands.
///
/// A command exclusively owns its subcommands, so the structure is always a
/// tree: no cycles and no shared nodes.
///
/// # Examples
///
/// ```
/// use autocompletor_core::{Command, Flag};
///
/// let mut git = Command::new("git");
/// git.flags.push(Flag::new(Some("-C"), None).taking_arg());
/// git.subcommands.push(Command::new("commit").with_description("Record changes"));
///
/// assert_eq!(git.subcommand_names(), vec!["commit"]);
/// assert!(git.find_flag("-C").is_some());
/// assert_eq!(git.depth(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    /// Identifier (e.g. "git", "commit")
    pub name: String,
    /// One-line summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Flags in discovery order, unique by [`Flag::key`]
    #[serde(default)]
    pub flags: Vec<Flag>,
    /// Nested subcommands in discovery order, unique by name
    #[serde(default)]
    pub subcommands: Vec<Command>,
}

impl Command {
    /// Creates an empty command with the given name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Sets the description, ignoring empty text.
    pub fn with_description(mut self, desc: &str) -> Self {
        let trimmed = desc.trim();
        if !trimmed.is_empty() {
            self.description = Some(trimmed.to_string());
        }
        self
    }

    /// Finds a direct subcommand by exact name.
    pub fn find_subcommand(&self, name: &str) -> Option<&Command> {
        self.subcommands.iter().find(|sub| sub.name == name)
    }

    /// Follows a path of subcommand names from this command.
    ///
    /// An empty path returns `self`.
    pub fn find_path(&self, path: &[&str]) -> Option<&Command> {
        path.iter()
            .try_fold(self, |node, name| node.find_subcommand(name))
    }

    /// Finds a flag by short or long form.
    pub fn find_flag(&self, flag: &str) -> Option<&Flag> {
        self.flags.iter().find(|f| f.matches(flag))
    }

    /// Gets all direct subcommand names.
    pub fn subcommand_names(&self) -> Vec<&str> {
        self.subcommands.iter().map(|s| s.name.as_str()).collect()
    }

    /// Returns `true` when neither flags nor subcommands were found.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty() && self.subcommands.is_empty()
    }

    /// Number of subcommand levels below this command (0 for a leaf).
    pub fn depth(&self) -> usize {
        self.subcommands
            .iter()
            .map(|sub| sub.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Visits every command in the tree in pre-order together with its path
    /// of names from the root (the root's path is just its own name).
    ///
    /// # Examples
    ///
    /// ```
    /// use autocompletor_core::Command;
    ///
    /// let mut root = Command::new("kubectl");
    /// let mut config = Command::new("config");
    /// config.subcommands.push(Command::new("view"));
    /// root.subcommands.push(config);
    ///
    /// let mut paths = Vec::new();
    /// root.walk(&mut |path, _| paths.push(path.join(" ")));
    /// assert_eq!(paths, vec!["kubectl", "kubectl config", "kubectl config view"]);
    /// ```
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&[&'a str], &'a Command)) {
        let mut path = Vec::new();
        self.walk_inner(&mut path, visit);
    }

    fn walk_inner<'a>(
        &'a self,
        path: &mut Vec<&'a str>,
        visit: &mut dyn FnMut(&[&'a str], &'a Command),
    ) {
        path.push(self.name.as_str());
        visit(path, self);
        for sub in &self.subcommands {
            sub.walk_inner(path, visit);
        }
        path.pop();
    }
}
