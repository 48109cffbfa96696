//! modules command - List the projects of the build

use super::load_build;
use crate::cli::Context;
use crate::ui::{output, report};
use anyhow::Result;

/// List every project in discovery order.
pub fn modules(ctx: &Context) -> Result<()> {
    let build = load_build(ctx)?;

    if build.json(ctx) {
        output::json(&report::module_views(&build.forest))?;
    } else {
        output::report(&report::render_modules(&build.forest));
    }

    for (idx, link) in build.forest.external_parents() {
        if let Some(project) = build.forest.get(idx) {
            log::debug!(
                "{} inherits from external parent {}",
                project.module_name(),
                link.id
            );
        }
    }
    Ok(())
}
