//! loader::traits
//!
//! Descriptor loader trait definition.
//!
//! # Design
//!
//! The forest builder never reads storage itself. It asks a
//! `DescriptorLoader` for the descriptor at a path relative to the directory
//! of the descriptor that declared it. Loaders return raw, unresolved
//! descriptors; inheritance and property resolution happen in
//! [`crate::core::forest`].
//!
//! All paths exchanged with a loader are relative to the loader's own root
//! (the directory holding the root descriptor).

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::types::RawDescriptor;

/// Errors from loading a descriptor.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// No descriptor exists at the resolved location.
    #[error("descriptor not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The descriptor exists but could not be read.
    #[error("failed to read descriptor '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The descriptor could not be parsed.
    #[error("failed to parse descriptor '{}': {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

impl LoaderError {
    /// The descriptor path the error refers to.
    pub fn path(&self) -> &Path {
        match self {
            LoaderError::NotFound { path }
            | LoaderError::Io { path, .. }
            | LoaderError::Parse { path, .. } => path,
        }
    }
}

/// A descriptor together with where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDescriptor {
    /// Directory against which the descriptor's module paths resolve.
    pub directory: PathBuf,
    /// The descriptor file itself.
    pub file: PathBuf,
    pub descriptor: RawDescriptor,
}

/// Source of raw project descriptors.
///
/// Implementations must be `Send + Sync` so a loader can be shared by
/// callers that build several forests.
pub trait DescriptorLoader: Send + Sync {
    /// Load the descriptor at `relative_path`, resolved against `base`.
    ///
    /// `relative_path` may name a directory (its default descriptor file is
    /// loaded) or a descriptor file.
    ///
    /// # Errors
    ///
    /// - `LoaderError::NotFound` if nothing exists at the location
    /// - `LoaderError::Parse` if the descriptor is malformed
    /// - `LoaderError::Io` for other read failures
    fn load(&self, base: &Path, relative_path: &str) -> Result<LoadedDescriptor, LoaderError>;
}
