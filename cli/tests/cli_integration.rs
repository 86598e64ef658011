#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const FAKE_PROGRAM: &str = r#"#!/bin/sh
case "$1" in
  --help|-h)
    cat <<'HELP'
Scans web servers in several modes

Usage:
  fakeprog [command]

Available Commands:
  dir         Uses directory/file enumeration mode
  dns         Uses DNS subdomain enumeration mode
  help        Help about any command

Flags:
  -t, --threads int      Number of concurrent threads (default 10)
  -q, --quiet            Don't print the banner
HELP
    ;;
  dir)
    cat <<'HELP'
Uses directory/file enumeration mode

Usage:
  fakeprog dir [flags]

Flags:
  -u, --url string       The target URL
  -x, --extensions string  File extension(s) to search for
HELP
    ;;
  *)
    exit 1
    ;;
esac
"#;

/// A temporary HOME holding an executable fake program.
struct Sandbox {
    home: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let home = tempfile::tempdir().expect("failed to create temp home");
        let program = home.path().join("fakeprog");
        fs::write(&program, FAKE_PROGRAM).expect("failed to write fake program");
        fs::set_permissions(&program, fs::Permissions::from_mode(0o755))
            .expect("failed to mark fake program executable");
        Self { home }
    }

    fn home(&self) -> &Path {
        self.home.path()
    }

    fn program(&self) -> PathBuf {
        self.home.path().join("fakeprog")
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_autocompletor"))
            .args(args)
            .env_clear()
            .env("PATH", std::env::var("PATH").unwrap_or_default())
            .env("HOME", self.home())
            .env("XDG_CONFIG_HOME", self.home().join(".config"))
            .env("SHELL", "/bin/bash")
            .output()
            .expect("failed to run autocompletor")
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_prints_fish_script_for_fake_program() {
    let sandbox = Sandbox::new();
    let program = sandbox.program();
    let output = sandbox.run(&[program.to_str().unwrap(), "--shell", "fish"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let script = stdout(&output);
    assert!(script.contains("complete -c fakeprog -f -n '__fish_use_subcommand' -a 'dir'"));
    assert!(script.contains("-a 'dns' -d 'Uses DNS subdomain enumeration mode'"));
    assert!(script.contains("complete -c fakeprog -s t -l threads -r"));
    assert!(script.contains(
        "complete -c fakeprog -n '__fish_seen_subcommand_from dir' -s u -l url -r -d 'The target URL'"
    ));
    assert!(!script.contains("-a 'help'"));
    assert!(stderr(&output).contains("Generating fish completions"));
}

#[test]
fn test_detects_shell_from_environment() {
    let sandbox = Sandbox::new();
    let program = sandbox.program();
    let output = sandbox.run(&[program.to_str().unwrap()]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("complete -F _fakeprog_completions fakeprog"));
}

#[test]
fn test_unknown_program_exits_with_ai_hint() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["autocompletor-definitely-missing-program", "--shell", "fish"]);

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("error: no completions found for `autocompletor-definitely-missing-program`"));
    assert!(err.contains("--ai ollama or --ai openai"));
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_dump_json_tree() {
    let sandbox = Sandbox::new();
    let program = sandbox.program();
    let output = sandbox.run(&[program.to_str().unwrap(), "--dump", "json", "--shell", "zsh"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let tree: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(tree["name"], "fakeprog");
    assert_eq!(tree["description"], "Scans web servers in several modes");
    assert_eq!(tree["subcommands"][0]["name"], "dir");
    assert_eq!(tree["subcommands"][0]["flags"][0]["long"], "--url");
    assert_eq!(tree["subcommands"][1]["name"], "dns");
}

#[test]
fn test_install_writes_zsh_completion_file() {
    let sandbox = Sandbox::new();
    let program = sandbox.program();
    let output = sandbox.run(&[program.to_str().unwrap(), "--shell", "zsh", "--install"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let path = sandbox.home().join(".zsh").join("completions").join("_fakeprog");
    let script = fs::read_to_string(&path).unwrap();
    assert!(script.starts_with("#compdef fakeprog\n"));
    assert!(stderr(&output).contains("Completions installed to"));
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_report_goes_to_stderr() {
    let sandbox = Sandbox::new();
    let program = sandbox.program();
    let output = sandbox.run(&[program.to_str().unwrap(), "--shell", "bash", "--report"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let err = stderr(&output);
    assert!(err.contains("primary=help"));
    assert!(err.contains("unavailable"), "dns probe should be reported: {err}");
}

#[test]
fn test_config_file_sets_shell() {
    let sandbox = Sandbox::new();
    let config = sandbox.home().join("custom.yml");
    fs::write(&config, "shell: zsh\ndiscovery:\n  max_depth: 1\n").unwrap();
    let program = sandbox.program();

    let output = sandbox.run(&[program.to_str().unwrap(), "--config", config.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).starts_with("#compdef fakeprog"));
}

#[test]
fn test_invalid_config_file_fails() {
    let sandbox = Sandbox::new();
    let config = sandbox.home().join("broken.yml");
    fs::write(&config, "shell: powershell\n").unwrap();

    let output = sandbox.run(&["ls", "--config", config.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("invalid config"));
}
