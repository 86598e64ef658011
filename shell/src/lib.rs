//! Shell support for autocompletor.
//!
//! - [`Shell`]: the supported shells, parsing and detection from the
//!   environment.
//! - [`generate`]: renders a [`Command`](autocompletor_core::Command) tree as
//!   a fish, bash or zsh completion script.
//! - [`install`]: writes a script where the shell picks it up.

pub mod error;
pub mod generate;
pub mod install;
pub mod shell;

pub use error::{Result, ShellError};
pub use generate::generate;
pub use install::{install, install_into};
pub use shell::Shell;
