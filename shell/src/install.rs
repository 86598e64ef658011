//! Writing completion scripts into the shell's completions directory.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Result, ShellError};
use crate::shell::Shell;

/// Installs `script` for `program` into the default directory of `shell`.
///
/// Returns the path that was written.
pub fn install(shell: Shell, program: &str, script: &str) -> Result<PathBuf> {
    let dir = shell.completions_dir()?;
    install_into(&dir, shell, program, script)
}

/// Installs `script` for `program` into `dir`, creating it if needed.
///
/// An existing completion file is overwritten.
pub fn install_into(dir: &Path, shell: Shell, program: &str, script: &str) -> Result<PathBuf> {
    create_dir(dir)?;

    let path = dir.join(shell.completion_file_name(program));
    fs::write(&path, script).map_err(|source| ShellError::Io {
        path: path.clone(),
        source,
    })?;

    info!(shell = %shell, path = %path.display(), "Installed completions");
    Ok(path)
}

fn create_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    debug!(path = %dir.display(), "Creating completions directory");

    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder.create(dir).map_err(|source| ShellError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_into_creates_directory_and_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join(".zsh").join("completions");

        let path = install_into(&dir, Shell::Zsh, "gobuster", "#compdef gobuster\n").unwrap();
        assert_eq!(path, dir.join("_gobuster"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "#compdef gobuster\n");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&dir).unwrap().permissions().mode();
            assert_eq!(mode & 0o777 & !0o755, 0);
        }
    }

    #[test]
    fn test_install_into_overwrites_existing_file() {
        let tmp = tempfile::tempdir().unwrap();
        install_into(tmp.path(), Shell::Fish, "tool", "old").unwrap();
        let path = install_into(tmp.path(), Shell::Fish, "tool", "new").unwrap();

        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("tool.fish"));
        assert_eq!(fs::read_to_string(path).unwrap(), "new");
    }

    #[test]
    fn test_install_into_reports_unwritable_target() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();

        let err = install_into(&blocker, Shell::Bash, "tool", "x").unwrap_err();
        assert!(matches!(err, ShellError::Io { .. }));
    }
}
