//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Global Config
//!
//! Located at (in order of precedence):
//! 1. `$POMLENS_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/pomlens/config.toml`
//! 3. `~/.pomlens/config.toml`
//!
//! # Project Config
//!
//! Located at `.pomlens.toml` in the build root. It accepts every global
//! key plus the project-only `descriptor` and `ignore`.
//!
//! # Validation
//!
//! Values are validated after parsing: repository names must name a
//! lookup backend, ignore entries must be `groupId:artifactId`, and
//! numeric limits must be positive.

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::types::Coordinate;

/// Report formats accepted by `[report] format`.
pub const VALID_FORMATS: &[&str] = &["text", "json"];

/// Global configuration (user scope).
///
/// # Example
///
/// ```toml
/// repository = "maven-central"
/// repository_url = "https://mirror.example.com/maven2"
///
/// [lookup]
/// concurrency = 8
/// timeout_secs = 10
///
/// [report]
/// format = "text"
/// show_usage = true
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Lookup backend name
    pub repository: Option<String>,

    /// Repository root overriding the backend default
    pub repository_url: Option<String>,

    pub lookup: Option<LookupSettings>,

    pub report: Option<ReportSettings>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_shared(
            self.repository.as_deref(),
            self.repository_url.as_deref(),
            self.lookup.as_ref(),
            self.report.as_ref(),
        )
    }
}

/// Project configuration, read from `.pomlens.toml` in the build root.
///
/// # Example
///
/// ```toml
/// descriptor = "pom.xml"
/// repository = "offline"
/// ignore = ["com.example:internal-bom"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Root descriptor file name
    pub descriptor: Option<String>,

    /// Coordinates skipped by update checks
    pub ignore: Option<Vec<String>>,

    pub repository: Option<String>,

    pub repository_url: Option<String>,

    pub lookup: Option<LookupSettings>,

    pub report: Option<ReportSettings>,
}

impl ProjectConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_shared(
            self.repository.as_deref(),
            self.repository_url.as_deref(),
            self.lookup.as_ref(),
            self.report.as_ref(),
        )?;

        if let Some(descriptor) = &self.descriptor {
            if descriptor.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "descriptor cannot be empty".to_string(),
                ));
            }
        }

        for entry in self.ignore.iter().flatten() {
            if Coordinate::parse(entry).is_none() {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid ignore entry '{}', expected groupId:artifactId",
                    entry
                )));
            }
        }

        Ok(())
    }
}

/// `[lookup]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LookupSettings {
    /// Queries in flight at once
    pub concurrency: Option<usize>,

    /// Per-query timeout in seconds
    pub timeout_secs: Option<u64>,
}

impl LookupSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == Some(0) {
            return Err(ConfigError::InvalidValue(
                "lookup.concurrency must be at least 1".to_string(),
            ));
        }
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue(
                "lookup.timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// `[report]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ReportSettings {
    /// "text" or "json"
    pub format: Option<String>,

    /// Append per-module usage to the `deps` report
    pub show_usage: Option<bool>,
}

impl ReportSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(format) = &self.format {
            if !VALID_FORMATS.contains(&format.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid report format '{}', must be one of: {}",
                    format,
                    VALID_FORMATS.join(", ")
                )));
            }
        }
        Ok(())
    }
}

fn validate_shared(
    repository: Option<&str>,
    repository_url: Option<&str>,
    lookup: Option<&LookupSettings>,
    report: Option<&ReportSettings>,
) -> Result<(), ConfigError> {
    if let Some(repository) = repository {
        let valid = crate::lookup::valid_repository_names();
        if !valid.iter().any(|name| *name == repository) {
            return Err(ConfigError::InvalidValue(format!(
                "invalid repository '{}', must be one of: {}",
                repository,
                valid.join(", ")
            )));
        }
    }

    if let Some(url) = repository_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue(format!(
                "repository_url must be an http(s) URL, got '{}'",
                url
            )));
        }
    }

    if let Some(lookup) = lookup {
        lookup.validate()?;
    }
    if let Some(report) = report {
        report.validate()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    mod global_config {
        use super::*;

        #[test]
        fn defaults() {
            let config = GlobalConfig::default();
            assert!(config.repository.is_none());
            assert!(config.lookup.is_none());
            assert!(config.validate().is_ok());
        }

        #[test]
        fn valid_repository() {
            let config = GlobalConfig {
                repository: Some("offline".to_string()),
                ..Default::default()
            };
            assert!(config.validate().is_ok());
        }

        #[test]
        fn invalid_repository() {
            let config = GlobalConfig {
                repository: Some("jcenter".to_string()),
                ..Default::default()
            };
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains("maven-central, offline"));
        }

        #[test]
        fn non_http_url_rejected() {
            let config = GlobalConfig {
                repository_url: Some("ftp://repo".to_string()),
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }

        #[test]
        fn zero_concurrency_rejected() {
            let config = GlobalConfig {
                lookup: Some(LookupSettings {
                    concurrency: Some(0),
                    timeout_secs: None,
                }),
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }

        #[test]
        fn roundtrip() {
            let config = GlobalConfig {
                repository: Some("maven-central".to_string()),
                repository_url: Some("https://mirror.example/maven2".to_string()),
                lookup: Some(LookupSettings {
                    concurrency: Some(4),
                    timeout_secs: Some(30),
                }),
                report: Some(ReportSettings {
                    format: Some("json".to_string()),
                    show_usage: Some(true),
                }),
            };

            let toml = toml::to_string_pretty(&config).unwrap();
            let parsed: GlobalConfig = toml::from_str(&toml).unwrap();
            assert_eq!(config, parsed);
        }
    }

    mod project_config {
        use super::*;

        #[test]
        fn parses_ignore_list() {
            let config: ProjectConfig = toml::from_str(
                r#"
                descriptor = "build.xml"
                ignore = ["com.example:bom", "org.acme:tools"]
                "#,
            )
            .unwrap();
            assert_eq!(config.descriptor.as_deref(), Some("build.xml"));
            assert!(config.validate().is_ok());
        }

        #[test]
        fn invalid_ignore_entry() {
            let config = ProjectConfig {
                ignore: Some(vec!["no-colon".to_string()]),
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }

        #[test]
        fn empty_descriptor_rejected() {
            let config = ProjectConfig {
                descriptor: Some("  ".to_string()),
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }

        #[test]
        fn invalid_report_format() {
            let config = ProjectConfig {
                report: Some(ReportSettings {
                    format: Some("yaml".to_string()),
                    show_usage: None,
                }),
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }

        #[test]
        fn reject_unknown_fields() {
            let result: Result<ProjectConfig, _> = toml::from_str("trunk = \"main\"");
            assert!(result.is_err());
        }
    }
}
