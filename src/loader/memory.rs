//! loader::memory
//!
//! In-memory descriptor loader for deterministic testing.
//!
//! # Example
//!
//! ```
//! use pomlens::loader::{DescriptorLoader, MemoryLoader};
//! use pomlens::core::types::RawDescriptor;
//! use std::path::Path;
//!
//! let loader = MemoryLoader::new()
//!     .with("", RawDescriptor::new(Some("com.example"), "root", Some("1.0")).with_module("child"))
//!     .with("child", RawDescriptor::new(None, "child", None));
//!
//! let child = loader.load(Path::new(""), "child").unwrap();
//! assert_eq!(child.descriptor.artifact_id.as_deref(), Some("child"));
//! assert_eq!(loader.loaded(), vec![Path::new("child/pom.xml").to_path_buf()]);
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::traits::{DescriptorLoader, LoadedDescriptor, LoaderError};
use crate::core::paths::{descriptor_location, join_relative, normalize};
use crate::core::types::RawDescriptor;

#[derive(Debug, Clone)]
enum Entry {
    Descriptor(RawDescriptor),
    Broken(String),
}

/// Loader serving descriptors from a map keyed by descriptor file path.
#[derive(Debug, Default)]
pub struct MemoryLoader {
    entries: HashMap<PathBuf, Entry>,
    /// Files handed out, in order.
    loads: Mutex<Vec<PathBuf>>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor at a directory (`""` for the root) or file path.
    pub fn with(mut self, path: &str, descriptor: RawDescriptor) -> Self {
        self.entries
            .insert(Self::key(path), Entry::Descriptor(descriptor));
        self
    }

    /// Register a location whose descriptor fails to parse.
    pub fn with_broken(mut self, path: &str, message: &str) -> Self {
        self.entries
            .insert(Self::key(path), Entry::Broken(message.to_string()));
        self
    }

    /// Load the root descriptor.
    pub fn root(&self) -> Result<LoadedDescriptor, LoaderError> {
        self.load(Path::new(""), "")
    }

    /// Descriptor files served so far.
    pub fn loaded(&self) -> Vec<PathBuf> {
        self.loads
            .lock()
            .map(|loads| loads.clone())
            .unwrap_or_default()
    }

    fn key(path: &str) -> PathBuf {
        descriptor_location(&normalize(Path::new(path))).1
    }
}

impl DescriptorLoader for MemoryLoader {
    fn load(&self, base: &Path, relative_path: &str) -> Result<LoadedDescriptor, LoaderError> {
        let location = join_relative(base, relative_path);
        let (directory, file) = descriptor_location(&location);

        match self.entries.get(&file) {
            None => Err(LoaderError::NotFound { path: file }),
            Some(Entry::Broken(message)) => Err(LoaderError::Parse {
                path: file,
                message: message.clone(),
            }),
            Some(Entry::Descriptor(descriptor)) => {
                if let Ok(mut loads) = self.loads.lock() {
                    loads.push(file.clone());
                }
                Ok(LoadedDescriptor {
                    directory,
                    file,
                    descriptor: descriptor.clone(),
                })
            }
        }
    }
}
