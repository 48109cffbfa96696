//! deps command - Consolidated dependency set

use super::load_build;
use crate::analysis::{dependency_usage_by_module, resolve_consolidated};
use crate::cli::Context;
use crate::ui::{output, report};
use anyhow::Result;

/// Show the nearest-wins dependency set of the whole build.
///
/// `with_usage` (or `report.show_usage` in config) adds the declaring
/// modules to each entry.
pub fn deps(ctx: &Context, with_usage: bool) -> Result<()> {
    let build = load_build(ctx)?;
    let consolidated = resolve_consolidated(&build.forest);
    let usage =
        (with_usage || build.config.show_usage()).then(|| dependency_usage_by_module(&build.forest));

    if build.json(ctx) {
        output::json(&report::dependency_views(&consolidated, usage.as_ref()))?;
    } else {
        output::report(&report::render_dependencies(&consolidated, usage.as_ref()));
    }
    Ok(())
}
