//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--file <path>` / `-f`: Root descriptor to analyze
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output
//! - `--json`: Machine-readable output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// pomlens - Inheritance-aware dependency analysis for multi-module Maven builds
#[derive(Parser, Debug)]
#[command(name = "pomlens")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if pomlens was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Root descriptor, relative to the working directory (default: pom.xml)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output: reports and errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit reports as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the modules of the build
    #[command(
        name = "modules",
        long_about = "List every project of the build in discovery order.\n\n\
            Each row shows the module, its inherited groupId:artifactId:version, \
            the descriptor path relative to the build root and the parent it \
            inherits from. Parents outside the build are marked external.",
        after_help = "\
EXAMPLES:
    pomlens modules
    pomlens modules --json
    pomlens -f services/pom.xml modules"
    )]
    Modules,

    /// Show the effective view of one project
    #[command(
        name = "show",
        long_about = "Show one project as the build sees it.\n\n\
            Prints the inherited coordinate, the effective properties (ancestor \
            properties overlaid with the project's own), the direct and managed \
            dependencies with placeholders resolved, and the dependencies visible \
            from the project after nearest-wins resolution.",
        after_help = "\
EXAMPLES:
    pomlens show core
    pomlens show web-api --json"
    )]
    Show {
        /// artifactId of the project
        artifact_id: String,
    },

    /// Show the consolidated dependency set
    #[command(
        name = "deps",
        long_about = "Show one entry per distinct groupId:artifactId across the build.\n\n\
            The version shown is the one nearest-wins resolution selects: a \
            project's own declaration beats its ancestors', and between unrelated \
            modules the deeper one wins, then the one discovered first."
    )]
    Deps {
        /// Also list the modules declaring each dependency
        #[arg(long)]
        usage: bool,
    },

    /// Report dependencies declared with different versions
    #[command(
        name = "conflicts",
        long_about = "Report dependencies whose direct declarations disagree on the version.\n\n\
            Only direct dependencies with an explicit version are compared. Managed \
            declarations set defaults and are not considered usage.",
        after_help = "\
EXAMPLES:
    # Inspect conflicts
    pomlens conflicts

    # Fail a CI job when any exist
    pomlens conflicts --fail"
    )]
    Conflicts {
        /// Exit with status 1 when conflicts are found
        #[arg(long)]
        fail: bool,
    },

    /// Show which modules use each dependency
    #[command(name = "usage")]
    Usage,

    /// Check for newer versions of dependencies and parents
    #[command(
        name = "updates",
        long_about = "Query a repository for the newest version of every consolidated \
            dependency and of every parent outside the build.\n\n\
            Queries run concurrently. A query that fails or times out is reported \
            as unknown and never fails the command.",
        after_help = "\
EXAMPLES:
    pomlens updates
    pomlens updates --repository offline
    pomlens updates --concurrency 16 --timeout 30"
    )]
    Updates {
        /// Lookup backend (maven-central, offline)
        #[arg(long, value_name = "NAME")]
        repository: Option<String>,

        /// Queries in flight at once
        #[arg(long, value_name = "N")]
        concurrency: Option<usize>,

        /// Per-query timeout in seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
    },

    /// Print the effective configuration
    #[command(name = "config")]
    Config,

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
EXAMPLES:
    pomlens completion bash > ~/.local/share/bash-completion/completions/pomlens
    pomlens completion zsh > ~/.zfunc/_pomlens
    pomlens completion fish > ~/.config/fish/completions/pomlens.fish"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["pomlens", "deps", "--json", "-f", "app/pom.xml"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.file, Some(PathBuf::from("app/pom.xml")));
        assert!(matches!(cli.command, Command::Deps { usage: false }));
    }

    #[test]
    fn updates_options() {
        let cli = Cli::try_parse_from([
            "pomlens",
            "updates",
            "--repository",
            "offline",
            "--concurrency",
            "3",
        ])
        .unwrap();
        match cli.command {
            Command::Updates {
                repository,
                concurrency,
                timeout,
            } => {
                assert_eq!(repository.as_deref(), Some("offline"));
                assert_eq!(concurrency, Some(3));
                assert_eq!(timeout, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn show_requires_artifact_id() {
        assert!(Cli::try_parse_from(["pomlens", "show"]).is_err());
    }
}
