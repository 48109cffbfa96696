//! analysis::consistency
//!
//! Cross-module version consistency checks.
//!
//! Only direct dependencies with a declared version take part: managed
//! declarations describe defaults, not usage, and a version-less
//! declaration has nothing to disagree about.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::forest::Forest;
use crate::core::types::Coordinate;

/// A dependency declared with more than one distinct version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Inconsistency {
    pub coordinate: Coordinate,
    /// Version to the modules declaring it, in discovery order.
    pub versions: BTreeMap<String, Vec<String>>,
}

impl Inconsistency {
    /// Every module involved, once each, in version order.
    pub fn modules(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for module in self.versions.values().flatten() {
            if !seen.contains(&module.as_str()) {
                seen.push(module.as_str());
            }
        }
        seen
    }
}

/// Dependencies whose direct declarations disagree on the version.
///
/// The result is sorted by coordinate. A module declaring the same
/// version twice is listed once under that version.
pub fn find_inconsistencies(forest: &Forest) -> Vec<Inconsistency> {
    let mut by_coordinate: BTreeMap<Coordinate, BTreeMap<String, Vec<String>>> = BTreeMap::new();

    for project in forest.projects() {
        let module = project.module_name();
        for dependency in &project.dependencies {
            let Some(version) = dependency.version.as_ref() else {
                continue;
            };
            let modules = by_coordinate
                .entry(dependency.coordinate())
                .or_default()
                .entry(version.clone())
                .or_default();
            if !modules.contains(&module) {
                modules.push(module.clone());
            }
        }
    }

    let found: Vec<Inconsistency> = by_coordinate
        .into_iter()
        .filter(|(_, versions)| versions.len() > 1)
        .map(|(coordinate, versions)| Inconsistency {
            coordinate,
            versions,
        })
        .collect();

    for inconsistency in &found {
        log::debug!(
            "{} declared with {} versions",
            inconsistency.coordinate,
            inconsistency.versions.len()
        );
    }
    found
}

/// Modules declaring each dependency directly, with or without a version.
pub fn dependency_usage_by_module(forest: &Forest) -> BTreeMap<Coordinate, Vec<String>> {
    let mut usage: BTreeMap<Coordinate, Vec<String>> = BTreeMap::new();
    for project in forest.projects() {
        let module = project.module_name();
        for dependency in &project.dependencies {
            let modules = usage.entry(dependency.coordinate()).or_default();
            if !modules.contains(&module) {
                modules.push(module.clone());
            }
        }
    }
    usage
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::forest::build_forest;
    use crate::core::types::{Dependency, ParentReference, RawDescriptor};
    use crate::loader::MemoryLoader;

    fn module(artifact: &str) -> RawDescriptor {
        RawDescriptor::new(None, artifact, None)
            .with_parent(ParentReference::new("g", "root", Some("1")))
    }

    fn forest_of(loader: MemoryLoader) -> Forest {
        build_forest(loader.root().unwrap(), &loader).unwrap()
    }

    fn three_modules(a: Dependency, b: Dependency, c: Dependency) -> Forest {
        forest_of(
            MemoryLoader::new()
                .with(
                    "",
                    RawDescriptor::new(Some("g"), "root", Some("1"))
                        .with_module("a")
                        .with_module("b")
                        .with_module("c"),
                )
                .with("a", module("a").with_dependency(a))
                .with("b", module("b").with_dependency(b))
                .with("c", module("c").with_dependency(c)),
        )
    }

    #[test]
    fn reports_disagreeing_versions() {
        let forest = three_modules(
            Dependency::new("org.slf4j", "slf4j-api", Some("1.7.36")),
            Dependency::new("org.slf4j", "slf4j-api", Some("2.0.9")),
            Dependency::new("org.slf4j", "slf4j-api", Some("1.7.36")),
        );

        let found = find_inconsistencies(&forest);
        assert_eq!(found.len(), 1);
        let entry = &found[0];
        assert_eq!(entry.coordinate.to_string(), "org.slf4j:slf4j-api");
        assert_eq!(entry.versions["1.7.36"], vec!["a", "c"]);
        assert_eq!(entry.versions["2.0.9"], vec!["b"]);
        assert_eq!(entry.modules(), vec!["a", "c", "b"]);
    }

    #[test]
    fn sorted_by_coordinate_string() {
        let forest = forest_of(
            MemoryLoader::new()
                .with(
                    "",
                    RawDescriptor::new(Some("g"), "root", Some("1"))
                        .with_module("a")
                        .with_module("b"),
                )
                .with(
                    "a",
                    module("a")
                        .with_dependency(Dependency::new("org.apache", "x", Some("1")))
                        .with_dependency(Dependency::new("org.apache.commons", "y", Some("1"))),
                )
                .with(
                    "b",
                    module("b")
                        .with_dependency(Dependency::new("org.apache", "x", Some("2")))
                        .with_dependency(Dependency::new("org.apache.commons", "y", Some("2"))),
                ),
        );

        let order: Vec<String> = find_inconsistencies(&forest)
            .iter()
            .map(|i| i.coordinate.to_string())
            .collect();
        assert_eq!(order, vec!["org.apache.commons:y", "org.apache:x"]);
    }

    #[test]
    fn agreeing_versions_are_not_reported() {
        let forest = three_modules(
            Dependency::new("x", "y", Some("1")),
            Dependency::new("x", "y", Some("1")),
            Dependency::new("x", "y", None),
        );
        assert!(find_inconsistencies(&forest).is_empty());
    }

    #[test]
    fn managed_declarations_are_ignored() {
        let forest = forest_of(
            MemoryLoader::new()
                .with(
                    "",
                    RawDescriptor::new(Some("g"), "root", Some("1"))
                        .with_managed_dependency(Dependency::new("x", "y", Some("1")))
                        .with_module("a"),
                )
                .with("a", module("a").with_dependency(Dependency::new("x", "y", Some("2")))),
        );
        assert!(find_inconsistencies(&forest).is_empty());
    }

    #[test]
    fn duplicate_declaration_in_one_module_is_listed_once() {
        let forest = forest_of(
            MemoryLoader::new()
                .with(
                    "",
                    RawDescriptor::new(Some("g"), "root", Some("1")).with_module("a"),
                )
                .with(
                    "a",
                    module("a")
                        .with_dependency(Dependency::new("x", "y", Some("1")))
                        .with_dependency(Dependency::new("x", "y", Some("1")).with_scope("test"))
                        .with_dependency(Dependency::new("x", "y", Some("2"))),
                ),
        );
        let found = find_inconsistencies(&forest);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].versions["1"], vec!["a"]);
    }

    #[test]
    fn usage_counts_versionless_declarations() {
        let forest = three_modules(
            Dependency::new("x", "y", Some("1")),
            Dependency::new("x", "y", None),
            Dependency::new("p", "q", Some("3")),
        );

        let usage = dependency_usage_by_module(&forest);
        assert_eq!(usage[&Coordinate::new("x", "y")], vec!["a", "b"]);
        assert_eq!(usage[&Coordinate::new("p", "q")], vec!["c"]);
        assert_eq!(usage.len(), 2);
    }
}
