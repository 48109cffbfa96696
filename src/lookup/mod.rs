//! lookup
//!
//! Version Lookup Service boundary.
//!
//! # Modules
//!
//! - `traits`: `VersionLookup` trait and `LookupError`
//! - `maven_central`: HTTP backend reading `maven-metadata.xml`
//! - `offline`: Backend that knows no versions
//! - [`mock`]: Mock backend for deterministic testing
//! - `factory`: Backend selection by configured name
//! - `batch`: Bounded concurrent update checks
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use pomlens::lookup::{create_lookup, LookupOptions, UpdateChecker, UpdateOptions};
//!
//! let lookup = create_lookup("maven-central", &LookupOptions::default())?;
//! let checker = UpdateChecker::new(Arc::from(lookup), UpdateOptions::default());
//! let updates = checker.check(&forest, &analysis.consolidated).await;
//! ```

mod batch;
mod factory;
mod maven_central;
pub mod mock;
mod offline;
mod traits;

pub use batch::{UpdateCandidate, UpdateChecker, UpdateKind, UpdateOptions, DEFAULT_CONCURRENCY};
pub use factory::{create_lookup, valid_repository_names, LookupOptions, Repository, DEFAULT_TIMEOUT};
pub use maven_central::{latest_from_metadata, MavenCentralLookup, DEFAULT_BASE_URL};
pub use offline::OfflineLookup;
pub use traits::{LookupError, VersionLookup};
