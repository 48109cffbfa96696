//! cli
//!
//! Command-line interface layer for pomlens.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Locate the build and load configuration
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. Handlers build the forest through
//! [`crate::core::forest`], run [`crate::analysis`] and hand the results to
//! [`crate::ui::report`] for display.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use anyhow::Result;
use std::path::PathBuf;

use crate::ui::output::Verbosity;

/// Settings shared by every command, taken from global flags.
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub cwd: Option<PathBuf>,
    pub file: Option<PathBuf>,
    pub debug: bool,
    pub quiet: bool,
    pub json: bool,
}

impl Context {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            cwd: cli.cwd.clone(),
            file: cli.file.clone(),
            debug: cli.debug,
            quiet: cli.quiet,
            json: cli.json,
        }
    }

    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }
}

/// Outcome of a command that completed without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Success,
    /// The command ran but its check failed (e.g. `conflicts --fail`).
    CheckFailed,
}

impl Exit {
    pub fn code(self) -> i32 {
        match self {
            Exit::Success => 0,
            Exit::CheckFailed => 1,
        }
    }
}

/// Run the CLI with already parsed arguments.
///
/// This is the main entry point called from `main.rs`.
pub fn run(cli: Cli) -> Result<Exit> {
    let ctx = Context::from_cli(&cli);
    commands::dispatch(cli.command, &ctx)
}
