#![cfg(unix)]

use std::time::Duration;

use autocompletor_discovery::{SourceRunner, SystemRunner, UnavailableReason};

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|part| part.to_string()).collect()
}

#[test]
fn test_invoke_combines_stdout_and_stderr() {
    let runner = SystemRunner::default();
    let output = runner
        .invoke(&argv(&["sh", "-c", "echo out; echo err 1>&2"]))
        .unwrap();
    assert!(output.contains("out"));
    assert!(output.contains("err"));
}

#[test]
fn test_invoke_accepts_nonzero_exit_with_output() {
    let runner = SystemRunner::default();
    let output = runner
        .invoke(&argv(&["sh", "-c", "echo 'usage: tool [-v]' 1>&2; exit 2"]))
        .unwrap();
    assert!(output.contains("usage: tool"));
}

#[test]
fn test_invoke_times_out_slow_program() {
    let runner = SystemRunner::new(Duration::from_millis(200));
    let err = runner
        .invoke(&argv(&["sh", "-c", "sleep 5"]))
        .unwrap_err();
    assert_eq!(err.reason, UnavailableReason::TimedOut);
}

#[test]
fn test_invoke_without_output_is_empty() {
    let runner = SystemRunner::default();
    let err = runner.invoke(&argv(&["sh", "-c", "true"])).unwrap_err();
    assert_eq!(err.reason, UnavailableReason::EmptyOutput);
}

#[test]
fn test_probe_runs_with_closed_stdin_and_dumb_terminal() {
    let runner = SystemRunner::default();
    let output = runner
        .invoke(&argv(&["sh", "-c", "cat; echo \"term=$TERM\""]))
        .unwrap();
    assert_eq!(output.trim(), "term=dumb");
}
