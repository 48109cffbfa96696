//! core
//!
//! Core domain types and the build model.
//!
//! # Modules
//!
//! - [`types`] - Coordinates, dependencies, raw descriptors and projects
//! - [`properties`] - `${...}` placeholder resolution against a project scope
//! - [`forest`] - Project forest construction and traversal
//! - [`paths`] - Lexical path handling for module and parent lookup
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Raw descriptors are never mutated; inheritance produces new projects
//! - Property resolution and traversal never fail, they degrade
//! - Every ordering is deterministic

pub mod config;
pub mod forest;
pub mod paths;
pub mod properties;
pub mod types;
