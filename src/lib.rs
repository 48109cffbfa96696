//! pomlens - Inheritance-aware dependency analysis for multi-module Maven builds
//!
//! pomlens loads a root `pom.xml` and every module it reaches, rebuilds the
//! parent/child inheritance structure, and answers questions about the
//! build as a whole: which version of a dependency wins, which modules
//! disagree on a version, who uses what, and what newer versions exist.
//!
//! # Architecture
//!
//! - [`core`] - Domain types, property resolution, the project forest, config
//! - [`loader`] - Descriptor loading boundary (`pom.xml` and in-memory)
//! - [`analysis`] - Nearest-wins resolution and consistency checks
//! - [`lookup`] - Version lookup boundary and bounded update checks
//! - [`ui`] - Output routing and report rendering
//! - [`cli`] - Command-line interface layer
//!
//! # Guarantees
//!
//! 1. Descriptors are read, never written
//! 2. Property resolution terminates on cyclic and deeply nested input
//! 3. Every report is deterministic for a given build
//! 4. Remote lookups never change analysis results

pub mod analysis;
pub mod cli;
pub mod core;
pub mod loader;
pub mod lookup;
pub mod ui;
