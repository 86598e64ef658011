//! Output formatting for command trees and build reports.

use autocompletor_core::{Command, Flag};

use crate::report::BuildReport;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    Table,
}

/// Formats a command tree in the requested output format.
pub fn format_tree(tree: &Command, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(tree).map_err(|e| format!("JSON serialization failed: {e}"))
        }
        OutputFormat::Yaml => {
            serde_yaml::to_string(tree).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Table => Ok(tree_to_table(tree)),
    }
}

/// Formats a build report in the requested output format.
pub fn format_report(report: &BuildReport, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(report)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(report).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Table => Ok(report_to_table(report)),
    }
}

fn tree_to_table(tree: &Command) -> String {
    let mut out = String::new();
    tree.walk(&mut |path, node| {
        let indent = "  ".repeat(path.len() - 1);
        match &node.description {
            Some(desc) => out.push_str(&format!("{indent}{} - {desc}\n", node.name)),
            None => out.push_str(&format!("{indent}{}\n", node.name)),
        }
        for flag in &node.flags {
            out.push_str(&format!("{indent}    {}", flag_label(flag)));
            if !flag.description.is_empty() {
                out.push_str(&format!("  {}", flag.description));
            }
            out.push('\n');
        }
    });
    out
}

fn flag_label(flag: &Flag) -> String {
    let mut label = [flag.short.as_deref(), flag.long.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(", ");
    if flag.takes_arg {
        label.push_str(" <arg>");
    }
    label
}

fn report_to_table(report: &BuildReport) -> String {
    let mut out = String::new();
    let primary = report
        .primary_source
        .map(|source| source.to_string())
        .unwrap_or_else(|| "none".to_string());
    out.push_str(&format!(
        "Program: {}  primary={}  at {}\n",
        report.program, primary, report.generated_at
    ));

    for node in &report.nodes {
        out.push_str(&format!(
            "{:<32} {:<5} {:<15} flags={:<4} subcommands={}",
            node.path.join(" "),
            node.source.to_string(),
            node.outcome.label(),
            node.flag_count,
            node.subcommand_count,
        ));
        if let crate::report::NodeOutcome::Unavailable { reason } = &node.outcome {
            out.push_str(&format!("  [{reason}]"));
        }
        out.push('\n');
    }

    for warning in &report.warnings {
        out.push_str(&format!("warning: {warning}\n"));
    }
    out
}
