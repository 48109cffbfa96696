//! updates command - Newer versions of dependencies and external parents

use std::sync::Arc;
use std::time::Duration;

use super::load_build;
use crate::analysis::resolve_consolidated;
use crate::cli::Context;
use crate::lookup::{create_lookup, LookupOptions, UpdateChecker, UpdateOptions};
use crate::ui::{output, report};
use anyhow::{Context as _, Result};

/// Check every consolidated dependency and external parent for updates.
///
/// Flags override the configured repository, concurrency and timeout.
pub fn updates(
    ctx: &Context,
    repository: Option<&str>,
    concurrency: Option<usize>,
    timeout_secs: Option<u64>,
) -> Result<()> {
    let build = load_build(ctx)?;
    let config = &build.config;

    let repository = repository.unwrap_or(config.repository());
    let timeout = timeout_secs
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.lookup_timeout());
    let lookup = create_lookup(
        repository,
        &LookupOptions {
            base_url: config.repository_url().map(str::to_string),
            timeout,
        },
    )?;

    let checker = UpdateChecker::new(
        Arc::from(lookup),
        UpdateOptions {
            concurrency: concurrency.unwrap_or_else(|| config.lookup_concurrency()),
            timeout,
            ignore: config.ignore(),
        },
    );

    let consolidated = resolve_consolidated(&build.forest);
    let planned = checker.plan(&build.forest, &consolidated).len();
    output::note(
        format!("Checking {} coordinates against {}", planned, repository),
        ctx.verbosity(),
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let results = runtime.block_on(checker.check(&build.forest, &consolidated));

    if build.json(ctx) {
        output::json(&results)?;
    } else {
        output::report(&report::render_updates(&results));
    }
    Ok(())
}
