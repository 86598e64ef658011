//! Supported shells and detection of the current one.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShellError};

/// A shell completion scripts can be generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shell {
    Fish,
    Bash,
    Zsh,
}

impl Shell {
    pub const ALL: [Shell; 3] = [Shell::Fish, Shell::Bash, Shell::Zsh];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fish => "fish",
            Self::Bash => "bash",
            Self::Zsh => "zsh",
        }
    }

    /// Detects the current shell from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Undetected`] when no hint is set and
    /// [`ShellError::Unsupported`] when `$SHELL` names another shell.
    pub fn detect() -> Result<Self> {
        Self::detect_with(|key| std::env::var(key).ok())
    }

    /// Detects the shell from an arbitrary variable lookup.
    ///
    /// Version variables exported by the running shell win over `$SHELL`,
    /// checked in the order `FISH_VERSION`, `ZSH_VERSION`, `BASH_VERSION`.
    ///
    /// # Examples
    ///
    /// ```
    /// use autocompletor_shell::Shell;
    ///
    /// let env = |key: &str| match key {
    ///     "SHELL" => Some("/usr/bin/zsh".to_string()),
    ///     _ => None,
    /// };
    /// assert_eq!(Shell::detect_with(env).unwrap(), Shell::Zsh);
    /// ```
    pub fn detect_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let is_set = |key: &str| lookup(key).is_some_and(|value| !value.is_empty());

        if is_set("FISH_VERSION") {
            return Ok(Self::Fish);
        }
        if is_set("ZSH_VERSION") {
            return Ok(Self::Zsh);
        }
        if is_set("BASH_VERSION") {
            return Ok(Self::Bash);
        }

        let shell_path = lookup("SHELL")
            .filter(|value| !value.is_empty())
            .ok_or(ShellError::Undetected)?;
        let name = Path::new(&shell_path)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&shell_path);
        name.parse()
    }

    /// Default completions directory for this shell under `home`.
    pub fn completions_dir_in(self, home: &Path) -> PathBuf {
        match self {
            Self::Fish => home.join(".config").join("fish").join("completions"),
            Self::Bash => home.join(".bash_completion.d"),
            Self::Zsh => home.join(".zsh").join("completions"),
        }
    }

    /// Default completions directory for this shell under the user's home.
    pub fn completions_dir(self) -> Result<PathBuf> {
        let dirs = directories::BaseDirs::new().ok_or(ShellError::NoHomeDir)?;
        Ok(self.completions_dir_in(dirs.home_dir()))
    }

    /// File name the shell loads completions for `program` from.
    pub fn completion_file_name(self, program: &str) -> String {
        match self {
            Self::Zsh => format!("_{program}"),
            _ => format!("{program}.{}", self.as_str()),
        }
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Shell {
    type Err = ShellError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "fish" => Ok(Self::Fish),
            "bash" => Ok(Self::Bash),
            "zsh" => Ok(Self::Zsh),
            _ => Err(ShellError::Unsupported(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_from_str_case_insensitive() {
        assert_eq!("FiSh".parse::<Shell>().unwrap(), Shell::Fish);
        assert_eq!("BASH".parse::<Shell>().unwrap(), Shell::Bash);
        assert_eq!("zsh".parse::<Shell>().unwrap(), Shell::Zsh);
        assert!(matches!(
            "powershell".parse::<Shell>(),
            Err(ShellError::Unsupported(name)) if name == "powershell"
        ));
    }

    #[test]
    fn test_detect_prefers_version_variables() {
        let lookup = env(&[
            ("SHELL", "/bin/bash"),
            ("ZSH_VERSION", "5.9"),
            ("FISH_VERSION", "3.7.1"),
        ]);
        assert_eq!(Shell::detect_with(lookup).unwrap(), Shell::Fish);

        let lookup = env(&[("SHELL", "/bin/fish"), ("BASH_VERSION", "5.2")]);
        assert_eq!(Shell::detect_with(lookup).unwrap(), Shell::Bash);
    }

    #[test]
    fn test_detect_falls_back_to_shell_basename() {
        let lookup = env(&[("SHELL", "/usr/local/bin/zsh"), ("ZSH_VERSION", "")]);
        assert_eq!(Shell::detect_with(lookup).unwrap(), Shell::Zsh);
    }

    #[test]
    fn test_detect_errors() {
        assert!(matches!(
            Shell::detect_with(env(&[])),
            Err(ShellError::Undetected)
        ));
        assert!(matches!(
            Shell::detect_with(env(&[("SHELL", "/bin/tcsh")])),
            Err(ShellError::Unsupported(name)) if name == "tcsh"
        ));
    }

    #[test]
    fn test_completions_dir_and_file_name() {
        let home = Path::new("/home/user");
        assert_eq!(
            Shell::Fish.completions_dir_in(home),
            PathBuf::from("/home/user/.config/fish/completions")
        );
        assert_eq!(
            Shell::Bash.completions_dir_in(home),
            PathBuf::from("/home/user/.bash_completion.d")
        );
        assert_eq!(
            Shell::Zsh.completions_dir_in(home),
            PathBuf::from("/home/user/.zsh/completions")
        );

        assert_eq!(Shell::Zsh.completion_file_name("gobuster"), "_gobuster");
        assert_eq!(Shell::Fish.completion_file_name("gobuster"), "gobuster.fish");
        assert_eq!(Shell::Bash.completion_file_name("gobuster"), "gobuster.bash");
    }
}
