//! lookup::factory
//!
//! Lookup backend selection and creation.
//!
//! Commands call [`create_lookup`] with the configured repository name
//! instead of constructing backends directly.

use std::time::Duration;

use super::maven_central::MavenCentralLookup;
use super::offline::OfflineLookup;
use super::traits::{LookupError, VersionLookup};

/// Default per-query timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Supported lookup backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repository {
    MavenCentral,
    Offline,
}

impl Repository {
    pub fn all() -> &'static [Repository] {
        &[Repository::MavenCentral, Repository::Offline]
    }

    /// Name used in configuration files and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Repository::MavenCentral => "maven-central",
            Repository::Offline => "offline",
        }
    }

    /// Parse a backend name, ignoring case.
    ///
    /// ```
    /// use pomlens::lookup::Repository;
    ///
    /// assert_eq!(Repository::parse("Maven-Central"), Some(Repository::MavenCentral));
    /// assert_eq!(Repository::parse("jcenter"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "maven-central" => Some(Repository::MavenCentral),
            "offline" => Some(Repository::Offline),
            _ => None,
        }
    }
}

impl std::fmt::Display for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Backend construction options.
#[derive(Debug, Clone)]
pub struct LookupOptions {
    /// Repository root overriding the backend's default.
    pub base_url: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Create the backend registered under `name`.
///
/// # Errors
///
/// - `LookupError::UnknownRepository` if no backend has that name
/// - `LookupError::Network` if the HTTP client cannot be built
pub fn create_lookup(
    name: &str,
    options: &LookupOptions,
) -> Result<Box<dyn VersionLookup>, LookupError> {
    let repository = Repository::parse(name).ok_or_else(|| LookupError::UnknownRepository {
        name: name.to_string(),
        available: valid_repository_names().join(", "),
    })?;

    log::debug!("using {} version lookup", repository);
    match repository {
        Repository::MavenCentral => Ok(Box::new(MavenCentralLookup::new(
            options.base_url.as_deref(),
            options.timeout,
        )?)),
        Repository::Offline => Ok(Box::new(OfflineLookup)),
    }
}

/// Valid backend names, for configuration validation.
pub fn valid_repository_names() -> Vec<&'static str> {
    Repository::all().iter().map(|r| r.name()).collect()
}
