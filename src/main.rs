//! pomlens binary entry point.

use std::process::ExitCode;

use flexi_logger::{LogSpecification, Logger, LoggerHandle};
use pomlens::cli::{self, Cli};
use pomlens::ui::output;

/// Install the stderr logger.
///
/// Default is `warn`; `--debug` raises this crate to `debug` and `--quiet`
/// lowers everything to `error`. `RUST_LOG` overrides both.
fn setup_logging(cli: &Cli) -> anyhow::Result<LoggerHandle> {
    let fallback = if cli.quiet {
        "error"
    } else if cli.debug {
        "warn,pomlens=debug"
    } else {
        "warn"
    };
    let spec = match std::env::var("RUST_LOG") {
        Ok(env) => LogSpecification::parse(env)?,
        Err(_) => LogSpecification::parse(fallback)?,
    };
    let handle = Logger::with(spec)
        .log_to_stderr()
        .format_for_stderr(flexi_logger::default_format)
        .start()?;
    Ok(handle)
}

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    let _logger = match setup_logging(&cli) {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("warning: logging disabled: {e}");
            None
        }
    };

    match cli::run(cli) {
        Ok(exit) => ExitCode::from(exit.code() as u8),
        Err(e) => {
            output::error(format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
