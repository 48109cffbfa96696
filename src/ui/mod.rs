//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Output routing and verbosity
//! - [`report`] - Text and JSON report rendering
//!
//! # Design
//!
//! All command output goes through this module so quiet and JSON modes
//! behave the same everywhere.

pub mod output;
pub mod report;
