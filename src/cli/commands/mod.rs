//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Locates the build and loads configuration via [`load_build`]
//! 2. Runs the analyses it needs
//! 3. Formats and displays output
//!
//! Handlers never modify descriptors.
//!
//! # Async Commands
//!
//! `updates` queries a remote repository. It builds its own tokio runtime
//! and blocks on the batch, so the rest of the CLI stays synchronous.

mod completion;
mod config_cmd;
mod conflicts;
mod deps;
mod modules;
mod show;
mod updates;
mod usage;

pub use completion::completion;
pub use config_cmd::config;
pub use conflicts::conflicts;
pub use deps::deps;
pub use modules::modules;
pub use show::show;
pub use updates::updates;
pub use usage::usage;

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use super::args::Command;
use super::{Context, Exit};
use crate::core::config::Config;
use crate::core::forest::{build_forest_at, Forest};
use crate::loader::PomLoader;
use crate::ui::output;

/// Dispatch a parsed command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<Exit> {
    match command {
        Command::Modules => modules(ctx).map(|_| Exit::Success),
        Command::Show { artifact_id } => show(ctx, &artifact_id).map(|_| Exit::Success),
        Command::Deps { usage } => deps(ctx, usage).map(|_| Exit::Success),
        Command::Conflicts { fail } => conflicts(ctx, fail),
        Command::Usage => usage(ctx).map(|_| Exit::Success),
        Command::Updates {
            repository,
            concurrency,
            timeout,
        } => updates(ctx, repository.as_deref(), concurrency, timeout).map(|_| Exit::Success),
        Command::Config => config(ctx).map(|_| Exit::Success),
        Command::Completion { shell } => completion(shell).map(|_| Exit::Success),
    }
}

/// A located, configured and loaded build.
#[derive(Debug)]
pub struct Build {
    /// Directory holding the root descriptor.
    pub root_dir: PathBuf,
    pub config: Config,
    pub forest: Forest,
}

impl Build {
    /// Whether reports should be JSON, from the flag or configuration.
    pub fn json(&self, ctx: &Context) -> bool {
        ctx.json || self.config.json_reports()
    }
}

/// Locate the build root and load its configuration.
///
/// With `--file`, the build root is the directory of that file and the
/// file name overrides the configured descriptor.
pub fn load_config(ctx: &Context) -> Result<(PathBuf, Option<String>, Config)> {
    let cwd = match &ctx.cwd {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };

    let (root_dir, descriptor) = match &ctx.file {
        Some(file) => {
            let path = cwd.join(file);
            let dir = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| cwd.clone());
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .with_context(|| format!("'{}' does not name a file", file.display()))?;
            (dir, Some(name))
        }
        None => (cwd, None),
    };

    let loaded = Config::load(Some(&root_dir)).context("Failed to load config")?;
    for warning in &loaded.warnings {
        output::warn(
            format!("{} ({})", warning.message, warning.path.display()),
            ctx.verbosity(),
        );
    }
    Ok((root_dir, descriptor, loaded.config))
}

/// Load configuration and build the forest.
pub fn load_build(ctx: &Context) -> Result<Build> {
    let (root_dir, descriptor, config) = load_config(ctx)?;
    let descriptor = descriptor.unwrap_or_else(|| config.descriptor().to_string());

    log::debug!(
        "building forest from {}",
        root_dir.join(&descriptor).display()
    );
    let loader = PomLoader::new(&root_dir);
    let forest = build_forest_at(&loader, &descriptor).with_context(|| {
        format!(
            "Failed to load build at '{}'",
            root_dir.join(&descriptor).display()
        )
    })?;

    Ok(Build {
        root_dir,
        config,
        forest,
    })
}
