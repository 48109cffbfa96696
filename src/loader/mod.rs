//! loader
//!
//! Descriptor loading boundary.
//!
//! # Modules
//!
//! - `traits`: `DescriptorLoader` trait, `LoadedDescriptor` and `LoaderError`
//! - [`pom`]: `pom.xml` loader over the filesystem
//! - [`memory`]: In-memory loader for deterministic testing

pub mod memory;
pub mod pom;
mod traits;

pub use memory::MemoryLoader;
pub use pom::{parse_pom, PomLoader};
pub use traits::*;
