//! lookup::traits
//!
//! Version lookup trait definition.
//!
//! # Design
//!
//! Lookups are async because the real backend talks to a remote
//! repository. A lookup answers "what is the newest published version of
//! this coordinate", nothing more. Absence is a valid answer (`Ok(None)`):
//! the coordinate may not be published in the queried repository at all.
//!
//! Nothing in the analysis core depends on a lookup succeeding; callers
//! treat errors as absence after logging them.

use async_trait::async_trait;
use thiserror::Error;

use crate::core::types::Coordinate;

/// Errors from version lookups.
#[derive(Debug, Clone, Error)]
pub enum LookupError {
    /// No backend is registered under the requested name.
    #[error("unknown repository '{name}'. Available repositories: {available}")]
    UnknownRepository { name: String, available: String },

    /// Connection or transport failure.
    #[error("network error: {0}")]
    Network(String),

    /// The repository answered with a non-success status.
    #[error("repository returned {status} for {url}")]
    Status { status: u16, url: String },

    /// The repository answer could not be understood.
    #[error("invalid repository metadata for {coordinate}: {message}")]
    Parse { coordinate: String, message: String },

    /// The lookup did not finish in time.
    #[error("lookup of {0} timed out")]
    Timeout(String),
}

/// Source of "latest available version" answers.
///
/// Implementations must be `Send + Sync` so one instance can serve
/// concurrent queries.
#[async_trait]
pub trait VersionLookup: Send + Sync {
    /// Backend name as used in configuration (e.g. "maven-central").
    fn name(&self) -> &'static str;

    /// Newest version of a dependency coordinate.
    ///
    /// `current` is the version the build currently resolves to, if any.
    /// Backends may use it to stay on the same release line; the bundled
    /// ones ignore it.
    async fn latest_version(
        &self,
        coordinate: &Coordinate,
        current: Option<&str>,
    ) -> Result<Option<String>, LookupError>;

    /// Newest version of a parent descriptor coordinate.
    async fn latest_parent_version(
        &self,
        coordinate: &Coordinate,
    ) -> Result<Option<String>, LookupError>;
}
