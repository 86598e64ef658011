//! Command tree discovery from man pages and `--help` output.
//!
//! This crate infers a program's flags and subcommand hierarchy by scraping
//! its documentation. It has two layers:
//!
//! - [`parser`]: offline, line-based heuristics that turn help text into
//!   flag records and subcommand entries. No commands are executed.
//! - [`TreeBuilder`]: runs the program (through a [`SourceRunner`]) with
//!   `--help` / `-h` for every discovered subcommand path, merges in the man
//!   page, and assembles a [`Command`] tree plus a [`BuildReport`].
//!
//! # Example
//!
//! ```
//! use autocompletor_discovery::parser::parse_help_output;
//!
//! let help = "\
//! Usage: mycli [OPTIONS] <COMMAND>
//!
//! Commands:
//!   build  Compile the project
//!   run    Run the project
//!
//! Options:
//!   -v, --verbose        Enable verbose output
//!   -o, --output <PATH>  Output file
//! ";
//!
//! let parsed = parse_help_output(help);
//! assert_eq!(parsed.subcommands[0].name, "build");
//! assert!(parsed.flags.iter().any(|f| f.long.as_deref() == Some("--output") && f.takes_arg));
//! ```
//!
//! [`Command`]: autocompletor_core::Command

pub mod builder;
pub mod error;
pub mod output;
pub mod parser;
pub mod report;
pub mod runner;

pub use builder::{BuildOptions, BuildRun, TreeBuilder};
pub use error::{DiscoveryError, Result, SourceUnavailable, UnavailableReason};
pub use report::{BuildReport, NodeOutcome, NodeReport, SourceKind};
pub use runner::{DEFAULT_TIMEOUT, HELP_FLAGS, SourceRunner, SystemRunner, default_probe_env};
