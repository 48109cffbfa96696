//! usage command - Modules declaring each dependency

use super::load_build;
use crate::analysis::dependency_usage_by_module;
use crate::cli::Context;
use crate::ui::{output, report};
use anyhow::Result;

pub fn usage(ctx: &Context) -> Result<()> {
    let build = load_build(ctx)?;
    let usage = dependency_usage_by_module(&build.forest);

    if build.json(ctx) {
        output::json(&usage)?;
    } else {
        output::report(&report::render_usage(&usage));
    }
    Ok(())
}
