//! Core command tree types shared by the autocompletor crates.
//!
//! This crate defines the data model produced by the extraction engine and
//! consumed by the shell generators:
//!
//! - [`Command`]: the root program or a subcommand, owning its flags and
//!   nested subcommands.
//! - [`Flag`]: an option with short and/or long form.
//!
//! Merging ([`merge_flags`], [`merge_subcommands`], [`backfill`]) combines
//! results from several sources with first-seen-wins semantics.
//!
//! Validation ([`validate_tree`]) catches structural errors such as
//! duplicate flags, malformed flag forms and trees that are too deep.
//!
//! # Example
//!
//! ```
//! use autocompletor_core::*;
//!
//! let mut root = Command::new("gobuster").with_description("Directory/DNS busting tool");
//! root.flags.push(
//!     Flag::new(Some("-t"), Some("--threads"))
//!         .with_description("Number of concurrent threads")
//!         .taking_arg(),
//! );
//! root.subcommands.push(Command::new("dir").with_description("Directory enumeration mode"));
//!
//! assert_eq!(root.find_subcommand("dir").unwrap().name, "dir");
//! assert!(root.find_flag("--threads").is_some());
//! assert!(validate_tree(&root, DEFAULT_MAX_DEPTH).is_empty());
//! ```

mod merge;
mod types;
mod validate;

pub use merge::{backfill, merge_flags, merge_subcommands, push_flag};
pub use types::*;
pub use validate::{ValidationError, validate_tree};
