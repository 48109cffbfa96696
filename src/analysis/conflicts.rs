//! analysis::conflicts
//!
//! Nearest-wins dependency conflict resolution.
//!
//! # Per-project view
//!
//! The dependencies visible from a project are found by walking its
//! ancestry from the project itself up to the root. For every
//! `groupId:artifactId` key the first declaration met is authoritative;
//! within one project direct dependencies are visited before managed ones.
//!
//! A declaration without a version never beats a versioned one: when the
//! nearest declaration is version-less, the first farther declaration that
//! carries a version supplies the version (and any other field the nearer
//! declaration left open). A version-less entry survives only when no
//! declaration of that key has a version.
//!
//! # Whole-build consolidation
//!
//! Project views are merged deepest project first (ties in discovery
//! order), and a key already present is only ever upgraded from
//! version-less to versioned, never overwritten. Because every view already
//! contains its ancestors' declarations, an ancestor processed later can
//! never replace what a descendant resolved. Between unrelated modules the
//! deeper one wins, then the one discovered first.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::core::forest::Forest;
use crate::core::types::{Coordinate, Dependency, ProjectId};

/// A dependency selected by nearest-wins, with its origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedDependency {
    pub dependency: Dependency,
    /// Project holding the nearest declaration of this key.
    pub declared_by: ProjectId,
    /// Whether that declaration came from dependency management.
    pub managed: bool,
}

impl ResolvedDependency {
    /// Apply the version-less rule against a farther declaration.
    fn absorb(&mut self, farther: &Dependency) {
        if self.dependency.version.is_none() && farther.version.is_some() {
            self.dependency = self.dependency.with_defaults_from(farther);
        }
    }
}

/// Dependencies visible from one project, in first-encounter order.
///
/// # Example
///
/// ```
/// use pomlens::analysis::conflicts::visible_dependencies;
/// use pomlens::core::forest::build_forest;
/// use pomlens::core::types::{Dependency, ParentReference, RawDescriptor};
/// use pomlens::loader::MemoryLoader;
///
/// let loader = MemoryLoader::new()
///     .with("", RawDescriptor::new(Some("g"), "root", Some("1"))
///         .with_managed_dependency(Dependency::new("g", "a", Some("1.0")))
///         .with_module("child"))
///     .with("child", RawDescriptor::new(None, "child", None)
///         .with_parent(ParentReference::new("g", "root", Some("1")))
///         .with_dependency(Dependency::new("g", "a", Some("2.0"))));
///
/// let forest = build_forest(loader.root().unwrap(), &loader).unwrap();
/// let view = visible_dependencies(&forest, 1);
/// assert_eq!(view[0].dependency.version.as_deref(), Some("2.0"));
/// ```
pub fn visible_dependencies(forest: &Forest, idx: usize) -> Vec<ResolvedDependency> {
    let mut view: Vec<ResolvedDependency> = Vec::new();
    let mut positions: HashMap<Coordinate, usize> = HashMap::new();

    for ancestor in forest.ancestry(idx) {
        let Some(project) = forest.get(ancestor) else {
            continue;
        };
        let id = project.id();

        let declared = project
            .dependencies
            .iter()
            .map(|d| (d, false))
            .chain(project.managed_dependencies.iter().map(|d| (d, true)));

        for (dependency, managed) in declared {
            match positions.get(&dependency.coordinate()) {
                Some(&pos) => view[pos].absorb(dependency),
                None => {
                    positions.insert(dependency.coordinate(), view.len());
                    view.push(ResolvedDependency {
                        dependency: dependency.clone(),
                        declared_by: id.clone(),
                        managed,
                    });
                }
            }
        }
    }
    view
}

/// One entry per distinct coordinate across the whole forest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConsolidatedDependencies {
    entries: BTreeMap<Coordinate, ResolvedDependency>,
}

impl ConsolidatedDependencies {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, coordinate: &Coordinate) -> Option<&ResolvedDependency> {
        self.entries.get(coordinate)
    }

    /// Entries sorted by coordinate.
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedDependency> {
        self.entries.values()
    }

    /// The winning dependencies sorted by coordinate.
    pub fn dependencies(&self) -> Vec<&Dependency> {
        self.iter().map(|r| &r.dependency).collect()
    }

    fn merge(&mut self, resolved: ResolvedDependency) {
        let key = resolved.dependency.coordinate();
        match self.entries.get_mut(&key) {
            Some(existing) => existing.absorb(&resolved.dependency),
            None => {
                self.entries.insert(key, resolved);
            }
        }
    }
}

/// Consolidate the nearest-wins views of every project.
///
/// See the module documentation for the merge order.
pub fn resolve_consolidated(forest: &Forest) -> ConsolidatedDependencies {
    let mut consolidated = ConsolidatedDependencies::default();
    for idx in forest.leaves_first_order() {
        for resolved in visible_dependencies(forest, idx) {
            consolidated.merge(resolved);
        }
    }
    log::debug!(
        "consolidated {} dependencies across {} projects",
        consolidated.len(),
        forest.len()
    );
    consolidated
}
