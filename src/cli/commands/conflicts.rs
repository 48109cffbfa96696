//! conflicts command - Report cross-module version disagreements

use super::load_build;
use crate::analysis::find_inconsistencies;
use crate::cli::{Context, Exit};
use crate::ui::{output, report};
use anyhow::Result;

/// Report inconsistencies; with `fail`, a non-empty report fails the check.
pub fn conflicts(ctx: &Context, fail: bool) -> Result<Exit> {
    let build = load_build(ctx)?;
    let inconsistencies = find_inconsistencies(&build.forest);

    if build.json(ctx) {
        output::json(&inconsistencies)?;
    } else {
        output::report(&report::render_inconsistencies(&inconsistencies));
    }

    if fail && !inconsistencies.is_empty() {
        return Ok(Exit::CheckFailed);
    }
    Ok(Exit::Success)
}
