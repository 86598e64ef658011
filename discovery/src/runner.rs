//! Source runners: the manual viewer and the target program itself.
//!
//! The tree builder only sees the [`SourceRunner`] trait so depth limits,
//! fallbacks and failure paths can be exercised with a scripted runner.
//! [`SystemRunner`] is the real implementation.
//!
//! Every child process runs with stdin closed, pagers and colors disabled, a
//! bounded wait, and a scratch working directory that is removed afterwards.

use std::fs;
use std::io::{ErrorKind, Read};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::debug;
use wait_timeout::ChildExt;

use crate::error::{SourceUnavailable, UnavailableReason};

/// Default bound on every external invocation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Help flags to try in order.
pub const HELP_FLAGS: &[&str] = &["--help", "-h"];

static PROBE_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Supplies raw documentation text.
///
/// Implementations must be shareable across threads because sibling probes
/// may run in parallel.
pub trait SourceRunner: Sync {
    /// Returns the rendered manual page for `program`.
    fn man_page(&self, program: &str) -> Result<String, SourceUnavailable>;

    /// Runs `argv` (program, subcommand path and help flag) and returns its
    /// combined stdout and stderr.
    fn invoke(&self, argv: &[String]) -> Result<String, SourceUnavailable>;
}

/// Runs real processes.
#[derive(Debug, Clone, Copy)]
pub struct SystemRunner {
    timeout: Duration,
}

impl SystemRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl SourceRunner for SystemRunner {
    fn man_page(&self, program: &str) -> Result<String, SourceUnavailable> {
        let argv = vec!["man".to_string(), program.to_string()];
        if !is_plausible_man_token(program) {
            return Err(SourceUnavailable::new(&argv, UnavailableReason::NotFound));
        }

        let captured = run_captured(&argv, self.timeout)?;
        // man prints "No manual entry" on stderr and exits non-zero.
        if !captured.success {
            return Err(SourceUnavailable::new(&argv, UnavailableReason::NotFound));
        }
        if captured.stdout.trim().is_empty() {
            return Err(SourceUnavailable::new(&argv, UnavailableReason::EmptyOutput));
        }
        Ok(captured.stdout)
    }

    fn invoke(&self, argv: &[String]) -> Result<String, SourceUnavailable> {
        let captured = run_captured(argv, self.timeout)?;
        let mut combined = captured.stdout;
        combined.push_str(&captured.stderr);
        if combined.trim().is_empty() {
            return Err(SourceUnavailable::new(argv, UnavailableReason::EmptyOutput));
        }
        Ok(combined)
    }
}

/// Environment overrides applied to every child.
pub fn default_probe_env() -> Vec<(&'static str, &'static str)> {
    vec![
        // Prevent graphical helpers from opening windows during probes.
        ("DISPLAY", ""),
        ("WAYLAND_DISPLAY", ""),
        ("BROWSER", "true"),
        // Keep interactive helpers from switching terminal modes.
        ("DEBIAN_FRONTEND", "noninteractive"),
        ("TERM", "dumb"),
        ("NO_COLOR", "1"),
        ("GIT_TERMINAL_PROMPT", "0"),
        // Avoid interactive pagers when commands route help through pager tools.
        ("PAGER", "cat"),
        ("MANPAGER", "cat"),
        ("SYSTEMD_PAGER", "cat"),
        ("GIT_PAGER", "cat"),
    ]
}

/// Man page names are passed as a single argument; reject anything that is
/// not a plain command name.
fn is_plausible_man_token(token: &str) -> bool {
    !token.is_empty()
        && token
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '+' | '.' | '_' | '-'))
        && !token.starts_with('-')
}

struct Captured {
    success: bool,
    stdout: String,
    stderr: String,
}

/// Scratch working directory for one probe, removed on drop.
struct ProbeWorkspace {
    path: PathBuf,
}

impl ProbeWorkspace {
    fn create() -> Option<Self> {
        let mut path = std::env::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .ok()
            .map(|duration| duration.as_nanos())
            .unwrap_or_default();
        let seq = PROBE_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        path.push(format!(
            "autocompletor-probe-{}-{nanos}-{seq}",
            std::process::id()
        ));
        fs::create_dir(&path).ok().map(|_| Self { path })
    }
}

impl Drop for ProbeWorkspace {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn run_captured(argv: &[String], timeout: Duration) -> Result<Captured, SourceUnavailable> {
    let Some((program, args)) = argv.split_first() else {
        return Err(SourceUnavailable::new(argv, UnavailableReason::NotFound));
    };

    let workspace = ProbeWorkspace::create();
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(workspace) = workspace.as_ref() {
        command.current_dir(&workspace.path);
    }
    for (key, value) in default_probe_env() {
        command.env(key, value);
    }

    let mut child = command.spawn().map_err(|e| {
        let reason = if e.kind() == ErrorKind::NotFound {
            UnavailableReason::NotFound
        } else {
            debug!(command = ?argv, error = %e, "Failed to spawn probe");
            UnavailableReason::SpawnFailed(e.to_string())
        };
        SourceUnavailable::new(argv, reason)
    })?;

    // Drain stdout and stderr in background threads to prevent deadlock when
    // the child's pipe buffer fills before it exits.
    let stdout_thread = child.stdout.take().map(spawn_reader);
    let stderr_thread = child.stderr.take().map(spawn_reader);

    match child.wait_timeout(timeout) {
        Ok(Some(status)) => Ok(Captured {
            success: status.success(),
            stdout: join_reader(stdout_thread, argv),
            stderr: join_reader(stderr_thread, argv),
        }),
        Ok(None) => {
            debug!(
                command = ?argv,
                timeout_ms = timeout.as_millis() as u64,
                "Probe timed out, killing process"
            );
            let _ = child.kill();
            let _ = child.wait();
            Err(SourceUnavailable::new(argv, UnavailableReason::TimedOut))
        }
        Err(e) => {
            debug!(command = ?argv, error = %e, "Failed to wait on probe");
            let _ = child.kill();
            let _ = child.wait();
            Err(SourceUnavailable::new(
                argv,
                UnavailableReason::WaitFailed(e.to_string()),
            ))
        }
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<Vec<u8>> {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        if let Err(e) = pipe.read_to_end(&mut buf) {
            debug!(error = %e, "Failed to read probe output");
        }
        buf
    })
}

fn join_reader(handle: Option<JoinHandle<Vec<u8>>>, argv: &[String]) -> String {
    let buf = handle
        .and_then(|thread| thread.join().ok())
        .unwrap_or_else(|| {
            debug!(command = ?argv, "Probe output reader unavailable");
            Vec::new()
        });
    String::from_utf8_lossy(&buf).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_probe_env_disables_pagers() {
        let env = default_probe_env();
        for key in ["PAGER", "GIT_PAGER", "MANPAGER", "SYSTEMD_PAGER"] {
            assert!(env.contains(&(key, "cat")), "{key} should be cat");
        }
        assert!(env.contains(&("TERM", "dumb")));
        assert!(env.contains(&("GIT_TERMINAL_PROMPT", "0")));
    }

    #[test]
    fn test_is_plausible_man_token() {
        assert!(is_plausible_man_token("git"));
        assert!(is_plausible_man_token("g++"));
        assert!(is_plausible_man_token("python3.12"));
        assert!(!is_plausible_man_token(""));
        assert!(!is_plausible_man_token("ls; rm"));
        assert!(!is_plausible_man_token("-k"));
    }

    #[test]
    fn test_missing_program_is_not_found() {
        let runner = SystemRunner::default();
        let argv = vec!["autocompletor-no-such-program-xyz".to_string(), "--help".to_string()];
        let err = runner.invoke(&argv).unwrap_err();
        assert_eq!(err.reason, UnavailableReason::NotFound);
    }

    #[test]
    fn test_probe_workspace_is_removed_on_drop() {
        let workspace = ProbeWorkspace::create().unwrap();
        let path = workspace.path.clone();
        assert!(path.is_dir());
        drop(workspace);
        assert!(!path.exists());
    }
}
