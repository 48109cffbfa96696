//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! pomlens has two configuration scopes:
//! - **Global**: User-level settings
//! - **Project**: Build-level overrides in `.pomlens.toml`
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Project config file
//! 4. CLI flags (not handled here)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$POMLENS_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/pomlens/config.toml`
//! 3. `~/.pomlens/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use pomlens::core::config::Config;
//! use std::path::Path;
//!
//! let result = Config::load(Some(Path::new("/path/to/build"))).unwrap();
//! let config = result.config;
//!
//! println!("Repository: {}", config.repository());
//! println!("Descriptor: {}", config.descriptor());
//! ```

pub mod schema;

pub use schema::{GlobalConfig, LookupSettings, ProjectConfig, ReportSettings};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::core::paths::DEFAULT_DESCRIPTOR;
use crate::core::types::Coordinate;
use crate::lookup::{DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT};

/// Environment variable naming an explicit global config file.
pub const CONFIG_ENV: &str = "POMLENS_CONFIG";

/// Project config file name, relative to the build root.
pub const PROJECT_CONFIG_FILE: &str = ".pomlens.toml";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    pub config: Config,
    pub warnings: Vec<ConfigWarning>,
}

/// Merged configuration from all sources.
///
/// Accessors apply precedence: project config over global config over
/// defaults.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub global: GlobalConfig,
    pub project: Option<ProjectConfig>,
    global_path: Option<PathBuf>,
    project_path: Option<PathBuf>,
}

/// Fully resolved settings, as printed by `pomlens config`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectiveConfig {
    pub descriptor: String,
    pub repository: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_url: Option<String>,
    pub ignore: Vec<String>,
    pub lookup: EffectiveLookup,
    pub report: EffectiveReport,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectiveLookup {
    pub concurrency: usize,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectiveReport {
    pub format: String,
    pub show_usage: bool,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// If `project_root` is provided, also loads `.pomlens.toml` from it.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be parsed or hold
    /// invalid values. Missing config files are not an error.
    pub fn load(project_root: Option<&Path>) -> Result<ConfigLoadResult, ConfigError> {
        Self::load_from(&Self::global_candidates(), project_root)
    }

    /// Load using an explicit list of global config candidates.
    ///
    /// The first candidate that exists is used.
    pub fn load_from(
        global_candidates: &[PathBuf],
        project_root: Option<&Path>,
    ) -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();

        let (global, global_path) = match global_candidates.iter().find(|p| p.exists()) {
            Some(path) => (read_config::<GlobalConfig>(path)?, Some(path.clone())),
            None => (GlobalConfig::default(), None),
        };

        let (project, project_path) = match project_root {
            Some(root) => {
                let path = root.join(PROJECT_CONFIG_FILE);
                if path.is_file() {
                    (Some(read_config::<ProjectConfig>(&path)?), Some(path))
                } else {
                    (None, None)
                }
            }
            None => (None, None),
        };

        global.validate()?;
        if let Some(ref p) = project {
            p.validate()?;
        }

        if let (Some(path), Some(p)) = (&project_path, &project) {
            if p.repository_url.is_some() && p.repository.as_deref() == Some("offline") {
                warnings.push(ConfigWarning {
                    message: "repository_url has no effect with the offline repository"
                        .to_string(),
                    path: path.clone(),
                });
            }
        }

        Ok(ConfigLoadResult {
            config: Config {
                global,
                project,
                global_path,
                project_path,
            },
            warnings,
        })
    }

    /// Global config locations in search order.
    pub fn global_candidates() -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            candidates.push(PathBuf::from(path));
        }
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            candidates.push(PathBuf::from(xdg_home).join("pomlens/config.toml"));
        }
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join(".pomlens/config.toml"));
        }
        candidates
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Root descriptor file name.
    ///
    /// Defaults to "pom.xml".
    pub fn descriptor(&self) -> &str {
        self.project
            .as_ref()
            .and_then(|p| p.descriptor.as_deref())
            .unwrap_or(DEFAULT_DESCRIPTOR)
    }

    /// Lookup backend name.
    ///
    /// Defaults to "maven-central".
    pub fn repository(&self) -> &str {
        self.project
            .as_ref()
            .and_then(|p| p.repository.as_deref())
            .or(self.global.repository.as_deref())
            .unwrap_or("maven-central")
    }

    pub fn repository_url(&self) -> Option<&str> {
        self.project
            .as_ref()
            .and_then(|p| p.repository_url.as_deref())
            .or(self.global.repository_url.as_deref())
    }

    /// Queries in flight during update checks.
    pub fn lookup_concurrency(&self) -> usize {
        self.lookup_setting(|l| l.concurrency)
            .unwrap_or(DEFAULT_CONCURRENCY)
    }

    /// Per-query timeout during update checks.
    pub fn lookup_timeout(&self) -> Duration {
        self.lookup_setting(|l| l.timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    /// Whether reports default to JSON.
    pub fn json_reports(&self) -> bool {
        self.report_setting(|r| r.format.clone()).as_deref() == Some("json")
    }

    /// Whether `deps` also prints usage by module.
    ///
    /// Defaults to `false`.
    pub fn show_usage(&self) -> bool {
        self.report_setting(|r| r.show_usage).unwrap_or(false)
    }

    /// Coordinates skipped by update checks.
    pub fn ignore(&self) -> Vec<Coordinate> {
        self.project
            .as_ref()
            .and_then(|p| p.ignore.as_ref())
            .map(|entries| entries.iter().filter_map(|e| Coordinate::parse(e)).collect())
            .unwrap_or_default()
    }

    /// All settings with defaults applied.
    pub fn effective(&self) -> EffectiveConfig {
        EffectiveConfig {
            descriptor: self.descriptor().to_string(),
            repository: self.repository().to_string(),
            repository_url: self.repository_url().map(str::to_string),
            ignore: self.ignore().iter().map(|c| c.to_string()).collect(),
            lookup: EffectiveLookup {
                concurrency: self.lookup_concurrency(),
                timeout_secs: self.lookup_timeout().as_secs(),
            },
            report: EffectiveReport {
                format: if self.json_reports() { "json" } else { "text" }.to_string(),
                show_usage: self.show_usage(),
            },
        }
    }

    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    pub fn project_config_loaded_from(&self) -> Option<&Path> {
        self.project_path.as_deref()
    }

    fn lookup_setting<T>(&self, get: impl Fn(&LookupSettings) -> Option<T>) -> Option<T> {
        self.project
            .as_ref()
            .and_then(|p| p.lookup.as_ref())
            .and_then(&get)
            .or_else(|| self.global.lookup.as_ref().and_then(&get))
    }

    fn report_setting<T>(&self, get: impl Fn(&ReportSettings) -> Option<T>) -> Option<T> {
        self.project
            .as_ref()
            .and_then(|p| p.report.as_ref())
            .and_then(&get)
            .or_else(|| self.global.report.as_ref().and_then(&get))
    }
}

fn read_config<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
