//! Command tree assembly.
//!
//! The builder picks the primary source, walks the subcommand hierarchy level
//! by level and merges results without duplicating names or flags.
//!
//! # Source selection
//!
//! 1. The man page is parsed first (strict subcommand detection). If it lists
//!    at least one flag it is primary: the `--help` tree is still explored,
//!    its subcommands missing from the man page are appended, and man-derived
//!    subcommands without flags are back-filled from `<program> <sub> --help`.
//! 2. Otherwise the tree comes entirely from `--help` / `-h` output.
//!
//! # Traversal
//!
//! Nodes live in an arena and are probed one depth level at a time. Each
//! node's listing schedules its children for the next level, up to
//! [`BuildOptions::max_depth`] levels below the root. A failed child keeps the
//! description from its parent's listing. With [`BuildOptions::jobs`] above 1
//! each level is probed on a rayon pool and results are collected in input
//! order before merging.
//!
//! # Example
//!
//! ```no_run
//! use autocompletor_discovery::{BuildOptions, TreeBuilder};
//!
//! let options = BuildOptions::default();
//! let runner = options.system_runner();
//! let run = TreeBuilder::new(&runner, options).build("git")?;
//! println!("git has {} subcommands", run.tree.subcommands.len());
//! # Ok::<(), autocompletor_discovery::DiscoveryError>(())
//! ```

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use autocompletor_core::{Command, DEFAULT_MAX_DEPTH, Flag, backfill, merge_subcommands};
use rayon::ThreadPool;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::{DiscoveryError, Result, SourceUnavailable, UnavailableReason};
use crate::parser::{ParsedHelp, parse_help_output, parse_man_page};
use crate::report::{BuildReport, NodeOutcome, SourceKind};
use crate::runner::{DEFAULT_TIMEOUT, HELP_FLAGS, SourceRunner, SystemRunner};

/// Minimum number of parent-listing names, the probed subcommand included,
/// a subcommand's help must list before it is considered an echo of the
/// parent's help.
const PARENT_ECHO_MIN_OVERLAP: usize = 3;

type ProbeResult = std::result::Result<ParsedHelp, SourceUnavailable>;

/// Tuning for one build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Subcommand levels below the root that may be created.
    pub max_depth: usize,
    /// Bound on each external invocation (used by [`Self::system_runner`]).
    pub timeout: Duration,
    /// Sibling probes run in parallel when above 1.
    pub jobs: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            timeout: DEFAULT_TIMEOUT,
            jobs: 1,
        }
    }
}

impl BuildOptions {
    /// A [`SystemRunner`] using this build's timeout.
    pub fn system_runner(&self) -> SystemRunner {
        SystemRunner::new(self.timeout)
    }
}

/// A finished build: the tree plus its diagnostics.
#[derive(Debug, Clone)]
pub struct BuildRun {
    pub tree: Command,
    pub report: BuildReport,
}

/// Builds command trees from an injected [`SourceRunner`].
pub struct TreeBuilder<'r> {
    runner: &'r dyn SourceRunner,
    options: BuildOptions,
}

#[derive(Debug)]
struct PendingNode {
    path: Vec<String>,
    depth: usize,
    parent: Option<usize>,
    description: Option<String>,
    flags: Vec<Flag>,
    children: Vec<usize>,
}

impl PendingNode {
    fn new(path: Vec<String>, depth: usize, parent: Option<usize>, description: Option<String>) -> Self {
        Self {
            path,
            depth,
            parent,
            description,
            flags: Vec::new(),
            children: Vec::new(),
        }
    }

    fn name(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or_default()
    }
}

impl<'r> TreeBuilder<'r> {
    pub fn new(runner: &'r dyn SourceRunner, options: BuildOptions) -> Self {
        Self { runner, options }
    }

    pub fn options(&self) -> BuildOptions {
        self.options
    }

    /// Builds the tree for `program`.
    ///
    /// Per-node failures only degrade the tree. The build fails with
    /// [`DiscoveryError::NoCompletionsFound`] when the root ends up with no
    /// flags and no subcommands.
    pub fn build(&self, program: &str) -> Result<BuildRun> {
        let mut report = BuildReport::new(program);
        let pool = self.worker_pool()?;
        let root_path = vec![program.to_string()];

        let man = match self.runner.man_page(program) {
            Ok(text) => Some(parse_man_page(&text)),
            Err(err) => {
                debug!(program, reason = %err.reason, "Man page unavailable");
                report.unavailable(&root_path, SourceKind::Man, &err);
                None
            }
        };

        let mut tree = match man {
            Some(parsed) if !parsed.flags.is_empty() => {
                self.build_from_man(program, parsed, pool.as_ref(), &mut report)
            }
            Some(parsed) => {
                debug!(program, "Man page lists no flags, falling back to --help");
                report.probed(&root_path, SourceKind::Man, 0, parsed.subcommands.len());
                self.build_from_help(program, pool.as_ref(), &mut report)?
            }
            None => self.build_from_help(program, pool.as_ref(), &mut report)?,
        };

        if tree.is_empty() {
            return Err(DiscoveryError::NoCompletionsFound {
                program: program.to_string(),
            });
        }

        tree.name = command_name(program);
        info!(
            program,
            flags = tree.flags.len(),
            subcommands = tree.subcommands.len(),
            depth = tree.depth(),
            "Built command tree"
        );
        Ok(BuildRun { tree, report })
    }

    fn build_from_help(
        &self,
        program: &str,
        pool: Option<&ThreadPool>,
        report: &mut BuildReport,
    ) -> Result<Command> {
        report.primary_source = Some(SourceKind::Help);
        match self.explore(program, pool, report) {
            Ok(tree) => Ok(tree),
            Err(DiscoveryError::SourceUnavailable(err)) => {
                debug!(program, error = %err, "Help output unavailable");
                Err(DiscoveryError::NoCompletionsFound {
                    program: program.to_string(),
                })
            }
            Err(other) => Err(other),
        }
    }

    fn build_from_man(
        &self,
        program: &str,
        parsed: ParsedHelp,
        pool: Option<&ThreadPool>,
        report: &mut BuildReport,
    ) -> Command {
        report.primary_source = Some(SourceKind::Man);
        report.probed(
            &[program.to_string()],
            SourceKind::Man,
            parsed.flags.len(),
            parsed.subcommands.len(),
        );

        let mut root = Command::new(program);
        root.description = parsed.summary;
        root.flags = parsed.flags;
        root.subcommands = parsed
            .subcommands
            .iter()
            .map(|entry| Command::new(&entry.name).with_description(&entry.description))
            .collect();

        let help_children = match self.explore(program, pool, report) {
            Ok(help_root) => {
                if root.description.is_none() {
                    root.description = help_root.description;
                }
                help_root.subcommands
            }
            Err(err) => {
                warn!(program, error = %err, "Help exploration failed, keeping man page results");
                report.warn(format!("--help exploration of '{program}' failed: {err}"));
                Vec::new()
            }
        };

        let man_names = root
            .subcommands
            .iter()
            .map(|sub| sub.name.to_ascii_lowercase())
            .collect::<HashSet<_>>();

        // Man-derived subcommands without flags: reuse the help tree's node
        // when it has one, otherwise probe `<program> <sub>` directly.
        let mut direct = Vec::new();
        for (idx, sub) in root.subcommands.iter_mut().enumerate() {
            if !sub.flags.is_empty() {
                continue;
            }
            match help_children.iter().find(|help_sub| help_sub.name == sub.name) {
                Some(help_sub) => {
                    backfill(sub, help_sub.clone());
                    if sub.subcommands.is_empty() {
                        sub.subcommands = help_sub.subcommands.clone();
                    }
                }
                None => direct.push(idx),
            }
        }

        let argvs = direct
            .iter()
            .map(|&idx| vec![program.to_string(), root.subcommands[idx].name.clone()])
            .collect::<Vec<_>>();
        let results = self.probe_all(&argvs, pool);
        for ((&idx, argv), result) in direct.iter().zip(&argvs).zip(results) {
            let sub = &mut root.subcommands[idx];
            match result {
                Ok(parsed) if is_parent_echo(&sub.name, &parsed, &man_names) => {
                    debug!(command = ?argv, "Subcommand echoed parent help, skipping back-fill");
                    report.outcome(argv, SourceKind::Help, NodeOutcome::ParentEcho);
                }
                Ok(parsed) => {
                    report.probed(argv, SourceKind::Help, parsed.flags.len(), 0);
                    let mut found = Command::new(&sub.name);
                    found.flags = parsed.flags;
                    found.description = parsed.summary;
                    backfill(sub, found);
                }
                Err(err) => {
                    debug!(command = ?argv, reason = %err.reason, "Back-fill probe unavailable");
                    report.unavailable(argv, SourceKind::Help, &err);
                }
            }
        }

        let added = merge_subcommands(&mut root.subcommands, help_children);
        debug!(program, added, "Merged help-only subcommands into man page tree");
        root
    }

    /// Explores the `--help` tree rooted at `program`, level by level.
    ///
    /// Fails only when the root itself produces no help output.
    fn explore(
        &self,
        program: &str,
        pool: Option<&ThreadPool>,
        report: &mut BuildReport,
    ) -> Result<Command> {
        let mut arena = vec![PendingNode::new(vec![program.to_string()], 0, None, None)];
        let mut level = vec![0];

        while !level.is_empty() {
            let argvs = level
                .iter()
                .map(|&idx| arena[idx].path.clone())
                .collect::<Vec<_>>();
            let results = self.probe_all(&argvs, pool);
            let mut next_level = Vec::new();

            for (&idx, result) in level.iter().zip(results) {
                let parsed = match result {
                    Ok(parsed) => parsed,
                    Err(err) if idx == 0 => {
                        report.unavailable(&arena[idx].path, SourceKind::Help, &err);
                        return Err(err.into());
                    }
                    Err(err) => {
                        warn!(
                            command = ?arena[idx].path,
                            reason = %err.reason,
                            "Subcommand help unavailable, keeping listing entry"
                        );
                        report.unavailable(&arena[idx].path, SourceKind::Help, &err);
                        continue;
                    }
                };

                if let Some(parent) = arena[idx].parent {
                    let siblings = arena[parent]
                        .children
                        .iter()
                        .map(|&child| arena[child].name().to_ascii_lowercase())
                        .collect::<HashSet<_>>();
                    if is_parent_echo(arena[idx].name(), &parsed, &siblings) {
                        debug!(command = ?arena[idx].path, "Subcommand echoed parent help, not descending");
                        report.outcome(&arena[idx].path, SourceKind::Help, NodeOutcome::ParentEcho);
                        continue;
                    }
                }

                let path = arena[idx].path.clone();
                let depth = arena[idx].depth;
                let name = arena[idx].name().to_string();

                let mut entries = parsed.subcommands;
                let before = entries.len();
                entries.retain(|entry| entry.name != name);
                if entries.len() != before {
                    report.warn(format!(
                        "Skipping nested '{name}' under '{}' due to detected self-cycle",
                        path.join(" ")
                    ));
                }

                {
                    let node = &mut arena[idx];
                    node.flags = parsed.flags;
                    if node.description.is_none() {
                        node.description = parsed.summary;
                    }
                }

                for entry in entries {
                    let mut child_path = path.clone();
                    child_path.push(entry.name);
                    if let Err(err) = check_depth(&child_path, depth + 1, self.options.max_depth) {
                        debug!(error = %err, "Not descending further");
                        report.outcome(&child_path, SourceKind::Help, NodeOutcome::DepthExceeded);
                        continue;
                    }
                    let description = Some(entry.description).filter(|desc| !desc.is_empty());
                    let child = arena.len();
                    arena.push(PendingNode::new(child_path, depth + 1, Some(idx), description));
                    arena[idx].children.push(child);
                    next_level.push(child);
                }

                report.probed(
                    &path,
                    SourceKind::Help,
                    arena[idx].flags.len(),
                    arena[idx].children.len(),
                );
            }

            level = next_level;
        }

        Ok(assemble(&mut arena, 0))
    }

    fn probe_all(&self, argvs: &[Vec<String>], pool: Option<&ThreadPool>) -> Vec<ProbeResult> {
        match pool {
            Some(pool) if argvs.len() > 1 => {
                pool.install(|| {
                    argvs
                        .par_iter()
                        .map(|argv| self.probe_help(argv))
                        .collect::<Vec<_>>()
                })
            }
            _ => argvs.iter().map(|argv| self.probe_help(argv)).collect(),
        }
    }

    /// Runs `prefix --help`, falling back to `prefix -h`.
    fn probe_help(&self, prefix: &[String]) -> ProbeResult {
        let mut last_err = None;
        for help_flag in HELP_FLAGS {
            let mut argv = prefix.to_vec();
            argv.push((*help_flag).to_string());
            debug!(command = ?argv, "Probing help");

            match self.runner.invoke(&argv) {
                Ok(text) => return Ok(parse_help_output(&text)),
                Err(err) => {
                    debug!(command = ?argv, reason = %err.reason, "Help probe produced no output");
                    let missing = err.reason == UnavailableReason::NotFound;
                    last_err = Some(err);
                    if missing {
                        break;
                    }
                }
            }
        }
        Err(last_err
            .unwrap_or_else(|| SourceUnavailable::new(prefix, UnavailableReason::EmptyOutput)))
    }

    fn worker_pool(&self) -> Result<Option<ThreadPool>> {
        if self.options.jobs <= 1 {
            return Ok(None);
        }
        rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.jobs)
            .build()
            .map(Some)
            .map_err(|e| DiscoveryError::WorkerPool(e.to_string()))
    }
}

/// Returns an error when a node at `depth` would exceed `max_depth`.
fn check_depth(path: &[String], depth: usize, max_depth: usize) -> Result<()> {
    if depth > max_depth {
        return Err(DiscoveryError::DepthExceeded {
            path: path.join(" "),
            max: max_depth,
        });
    }
    Ok(())
}

/// Some CLIs print top-level help for `<program> <sub> --help`. That output
/// lists the probed subcommand itself plus several of its siblings.
fn is_parent_echo(name: &str, parsed: &ParsedHelp, siblings: &HashSet<String>) -> bool {
    if parsed.subcommands.len() < 2 {
        return false;
    }

    let listed = parsed
        .subcommands
        .iter()
        .map(|entry| entry.name.to_ascii_lowercase())
        .collect::<HashSet<_>>();
    if !listed.contains(&name.to_ascii_lowercase()) {
        return false;
    }

    listed.intersection(siblings).count() >= PARENT_ECHO_MIN_OVERLAP
}

fn assemble(arena: &mut [PendingNode], idx: usize) -> Command {
    let children = std::mem::take(&mut arena[idx].children);
    let subcommands = children
        .into_iter()
        .map(|child| assemble(arena, child))
        .collect();

    let node = &mut arena[idx];
    Command {
        name: node.name().to_string(),
        description: node.description.take(),
        flags: std::mem::take(&mut node.flags),
        subcommands,
    }
}

/// Completion scripts are keyed by the executable's file name.
fn command_name(program: &str) -> String {
    Path::new(program)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(program)
        .to_string()
}
