//! analysis
//!
//! Read-only analyses over a built [`Forest`].
//!
//! # Modules
//!
//! - [`conflicts`]: Nearest-wins dependency resolution
//! - [`consistency`]: Version disagreements and per-module usage

pub mod conflicts;
pub mod consistency;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::forest::Forest;
use crate::core::types::Coordinate;

pub use conflicts::{
    resolve_consolidated, visible_dependencies, ConsolidatedDependencies, ResolvedDependency,
};
pub use consistency::{dependency_usage_by_module, find_inconsistencies, Inconsistency};

/// All analyses of one forest.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub consolidated: ConsolidatedDependencies,
    pub inconsistencies: Vec<Inconsistency>,
    pub usage: BTreeMap<Coordinate, Vec<String>>,
}

impl Analysis {
    pub fn run(forest: &Forest) -> Self {
        Self {
            consolidated: resolve_consolidated(forest),
            inconsistencies: find_inconsistencies(forest),
            usage: dependency_usage_by_module(forest),
        }
    }
}
