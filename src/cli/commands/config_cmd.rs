//! config command - Print the effective configuration

use super::load_config;
use crate::cli::Context;
use crate::ui::output;
use anyhow::{Context as _, Result};

/// Print every setting with defaults and overrides applied.
///
/// Text mode prints TOML that can be pasted into a config file; the
/// files the values came from are noted on stderr.
pub fn config(ctx: &Context) -> Result<()> {
    let (_, descriptor, config) = load_config(ctx)?;
    let mut effective = config.effective();
    if let Some(descriptor) = descriptor {
        effective.descriptor = descriptor;
    }

    if ctx.json || config.json_reports() {
        output::json(&effective)?;
        return Ok(());
    }

    let verbosity = ctx.verbosity();
    match config.global_config_loaded_from() {
        Some(path) => output::note(format!("# global: {}", path.display()), verbosity),
        None => output::note("# global: (none)", verbosity),
    }
    match config.project_config_loaded_from() {
        Some(path) => output::note(format!("# project: {}", path.display()), verbosity),
        None => output::note("# project: (none)", verbosity),
    }

    let rendered =
        toml::to_string_pretty(&effective).context("Failed to render configuration")?;
    output::report(&rendered);
    Ok(())
}
