//! show command - Effective view of one project

use super::load_build;
use crate::analysis::visible_dependencies;
use crate::cli::Context;
use crate::ui::report::{self, ProjectView};
use crate::ui::output;
use anyhow::{bail, Result};

/// Show the project whose artifactId is `artifact_id`.
pub fn show(ctx: &Context, artifact_id: &str) -> Result<()> {
    let build = load_build(ctx)?;
    let forest = &build.forest;

    let found = forest
        .find_by_artifact(artifact_id)
        .and_then(|idx| forest.get(idx).map(|project| (idx, project)));
    let Some((idx, project)) = found else {
        let known: Vec<String> = forest.projects().iter().map(|p| p.module_name()).collect();
        bail!(
            "No project with artifactId '{}'. Known projects:\n{}",
            artifact_id,
            output::format_list(&known, "  - ")
        );
    };

    let view = ProjectView {
        project,
        visible_dependencies: visible_dependencies(forest, idx),
    };

    if build.json(ctx) {
        output::json(&view)?;
    } else {
        output::report(&report::render_project(&view));
    }
    Ok(())
}
