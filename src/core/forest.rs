//! core::forest
//!
//! Project forest construction and parent/child navigation.
//!
//! # Architecture
//!
//! The forest is the set of projects reachable from a root descriptor via
//! declared module paths. It owns every [`Project`]; parent links are
//! stored as indices into the project list, never as owning pointers, so a
//! forest can be rebuilt from the same loader any number of times.
//!
//! Building happens in one pass:
//!
//! 1. Discover descriptors depth-first, in module declaration order
//! 2. Link each project to its parent (relativePath, then coordinate)
//! 3. Inherit groupId/version and merge property scopes, parents first
//! 4. Resolve every dependency version through the project's scope
//!
//! # Invariants
//!
//! - Project ids (`groupId:artifactId:version`) are unique within a forest
//! - Projects are ordered by discovery; index 0 is the root
//! - A missing or malformed module aborts the whole build
//! - Ancestor walks terminate even if parent links form a cycle

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::paths::{descriptor_location, join_relative};
use super::properties::PropertyScope;
use super::types::{Dependency, ParentLink, Project, ProjectId};
use crate::loader::{DescriptorLoader, LoadedDescriptor, LoaderError};

/// Errors from building a forest.
#[derive(Debug, Error)]
pub enum ForestError {
    /// A module descriptor was missing or could not be parsed.
    #[error("failed to load module '{relative_path}': {source}")]
    Descriptor {
        /// The module location, relative to the forest root.
        relative_path: String,
        #[source]
        source: LoaderError,
    },

    /// Two descriptors resolve to the same project id.
    #[error("duplicate project {id} in '{}' and '{}'", first.display(), second.display())]
    DuplicateProject {
        id: ProjectId,
        first: PathBuf,
        second: PathBuf,
    },
}

/// All projects of one multi-module build.
#[derive(Debug, Clone, Default)]
pub struct Forest {
    projects: Vec<Project>,
    index: HashMap<ProjectId, usize>,
    parents: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
}

impl Forest {
    /// Projects in discovery order.
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Project> {
        self.projects.get(idx)
    }

    /// The root project (first discovered).
    pub fn root(&self) -> Option<&Project> {
        self.projects.first()
    }

    /// Index of the project with the given id.
    pub fn find(&self, id: &ProjectId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Index of the first project whose artifactId matches.
    pub fn find_by_artifact(&self, artifact_id: &str) -> Option<usize> {
        self.projects
            .iter()
            .position(|p| p.artifact_id.as_deref() == Some(artifact_id))
    }

    /// Index of a project's parent, if the parent is part of this forest.
    pub fn parent(&self, idx: usize) -> Option<usize> {
        self.parents.get(idx).copied().flatten()
    }

    /// Indices of a project's children in discovery order.
    pub fn children(&self, idx: usize) -> &[usize] {
        self.children.get(idx).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The project itself followed by its ancestors, nearest first.
    ///
    /// Stops at the first project without a parent in the forest, or when
    /// a project would repeat.
    ///
    /// # Example
    ///
    /// ```
    /// use pomlens::core::forest::build_forest;
    /// use pomlens::core::types::{ParentReference, RawDescriptor};
    /// use pomlens::loader::MemoryLoader;
    ///
    /// let loader = MemoryLoader::new()
    ///     .with("", RawDescriptor::new(Some("g"), "root", Some("1")).with_module("a"))
    ///     .with("a", RawDescriptor::new(None, "a", None)
    ///         .with_parent(ParentReference::new("g", "root", Some("1")))
    ///         .with_module("b"))
    ///     .with("a/b", RawDescriptor::new(None, "b", None)
    ///         .with_parent(ParentReference::new("g", "a", Some("1"))));
    ///
    /// let forest = build_forest(loader.root().unwrap(), &loader).unwrap();
    /// assert_eq!(forest.ancestry(2), vec![2, 1, 0]);
    /// ```
    pub fn ancestry(&self, idx: usize) -> Vec<usize> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(idx).filter(|&i| i < self.projects.len());

        while let Some(i) = current {
            if !seen.insert(i) {
                break;
            }
            chain.push(i);
            current = self.parent(i);
        }
        chain
    }

    /// Number of ancestors of a project inside the forest.
    pub fn depth(&self, idx: usize) -> usize {
        self.ancestry(idx).len().saturating_sub(1)
    }

    /// Project indices ordered root-most first.
    ///
    /// Sorted by depth ascending; ties keep discovery order.
    pub fn parents_first_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.projects.len()).collect();
        order.sort_by_key(|&i| self.depth(i));
        order
    }

    /// Project indices ordered deepest first.
    ///
    /// Sorted by depth descending; ties keep discovery order.
    pub fn leaves_first_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.projects.len()).collect();
        order.sort_by_key(|&i| std::cmp::Reverse(self.depth(i)));
        order
    }

    /// Projects whose declared parent is not part of the forest.
    pub fn external_parents(&self) -> Vec<(usize, &ParentLink)> {
        self.projects
            .iter()
            .enumerate()
            .filter(|(i, _)| self.parent(*i).is_none())
            .filter_map(|(i, p)| p.parent.as_ref().map(|link| (i, link)))
            .collect()
    }

    /// Find a project that is its own ancestor.
    pub fn find_cycle(&self) -> Option<usize> {
        (0..self.projects.len()).find(|&i| {
            let mut seen = HashSet::new();
            let mut current = self.parent(i);
            while let Some(p) = current {
                if p == i {
                    return true;
                }
                if !seen.insert(p) {
                    return false;
                }
                current = self.parent(p);
            }
            false
        })
    }
}

/// Load the root descriptor at `root_path` and build its forest.
///
/// # Errors
///
/// Returns `ForestError::Descriptor` if the root or any module fails to load.
pub fn build_forest_at(
    loader: &dyn DescriptorLoader,
    root_path: &str,
) -> Result<Forest, ForestError> {
    let root = loader
        .load(Path::new(""), root_path)
        .map_err(|source| ForestError::Descriptor {
            relative_path: root_path.to_string(),
            source,
        })?;
    build_forest(root, loader)
}

/// Build the forest reachable from an already loaded root descriptor.
///
/// # Errors
///
/// - `ForestError::Descriptor` for the first module that is missing or
///   malformed; no partial forest is returned
/// - `ForestError::DuplicateProject` if two descriptors share an id
pub fn build_forest(
    root: LoadedDescriptor,
    loader: &dyn DescriptorLoader,
) -> Result<Forest, ForestError> {
    let mut loaded = Vec::new();
    let mut seen = HashSet::new();
    discover(root, loader, &mut loaded, &mut seen)?;

    log::debug!("discovered {} descriptors", loaded.len());

    let directories: Vec<PathBuf> = loaded.iter().map(|l| l.directory.clone()).collect();
    let projects: Vec<Project> = loaded.into_iter().map(provisional_project).collect();
    let parents = link_parents(&projects, &directories);

    let mut children = vec![Vec::new(); projects.len()];
    for (child, parent) in parents.iter().enumerate() {
        if let Some(p) = parent {
            children[*p].push(child);
        }
    }

    let mut forest = Forest {
        projects,
        index: HashMap::new(),
        parents,
        children,
    };

    if let Some(idx) = forest.find_cycle() {
        log::warn!(
            "parent chain of '{}' is cyclic; ancestry is truncated",
            forest.projects[idx].relative_path.display()
        );
    }

    inherit(&mut forest);
    index_projects(&mut forest)?;
    resolve_dependency_versions(&mut forest.projects);

    Ok(forest)
}

/// Depth-first pre-order discovery over declared module paths.
fn discover(
    current: LoadedDescriptor,
    loader: &dyn DescriptorLoader,
    out: &mut Vec<LoadedDescriptor>,
    seen: &mut HashSet<PathBuf>,
) -> Result<(), ForestError> {
    if !seen.insert(current.file.clone()) {
        log::warn!(
            "descriptor '{}' is listed more than once; skipping",
            current.file.display()
        );
        return Ok(());
    }

    let directory = current.directory.clone();
    let modules = current.descriptor.modules.clone();
    out.push(current);

    for module in &modules {
        let child = loader
            .load(&directory, module)
            .map_err(|source| ForestError::Descriptor {
                relative_path: join_relative(&directory, module).display().to_string(),
                source,
            })?;
        discover(child, loader, out, seen)?;
    }
    Ok(())
}

/// Project with groupId/version taken from the descriptor or its parent
/// reference; dependencies still raw.
fn provisional_project(loaded: LoadedDescriptor) -> Project {
    let raw = loaded.descriptor;
    let parent_ref = raw.parent.as_ref();

    let group_id = raw
        .group_id
        .clone()
        .or_else(|| parent_ref.map(|p| p.group_id.clone()));
    let version = raw
        .version
        .clone()
        .or_else(|| parent_ref.and_then(|p| p.version.clone()));

    let parent = raw.parent.as_ref().map(|p| ParentLink {
        id: ProjectId::new(
            &p.group_id,
            &p.artifact_id,
            p.version.clone().unwrap_or_default(),
        ),
        relative_path: p.relative_path.clone(),
    });

    Project {
        group_id,
        artifact_id: raw.artifact_id,
        version,
        packaging: raw.packaging,
        name: raw.name,
        relative_path: loaded.file,
        properties: raw.properties,
        effective_properties: Default::default(),
        dependencies: raw.dependencies,
        managed_dependencies: raw.managed_dependencies,
        modules: raw.modules,
        parent,
    }
}

/// Match every parent link to a project in the forest.
///
/// The descriptor at the parent's relativePath wins when its coordinate
/// agrees; otherwise an exact id match, then a unique coordinate match.
/// An empty relativePath skips the file lookup.
fn link_parents(projects: &[Project], directories: &[PathBuf]) -> Vec<Option<usize>> {
    let by_file: HashMap<&Path, usize> = projects
        .iter()
        .enumerate()
        .map(|(i, p)| (p.relative_path.as_path(), i))
        .collect();

    projects
        .iter()
        .enumerate()
        .map(|(idx, project)| {
            let link = project.parent.as_ref()?;
            let wanted = link.id.coordinate();
            let candidate = |i: &usize| *i != idx && projects[*i].coordinate() == wanted;

            if let Some(relative) = link.lookup_path() {
                let (_, parent_file) =
                    descriptor_location(&join_relative(&directories[idx], relative));
                if let Some(i) = by_file
                    .get(parent_file.as_path())
                    .copied()
                    .filter(|i| candidate(i))
                {
                    return Some(i);
                }
            }

            if !link.id.version.is_empty() {
                if let Some(i) = (0..projects.len())
                    .filter(candidate)
                    .find(|i| projects[*i].version.as_deref() == Some(link.id.version.as_str()))
                {
                    return Some(i);
                }
            }

            let matches: Vec<usize> = (0..projects.len()).filter(candidate).collect();
            match matches.as_slice() {
                [only] => Some(*only),
                [] => {
                    log::debug!(
                        "parent {} of '{}' is outside the forest",
                        link.id,
                        project.relative_path.display()
                    );
                    None
                }
                _ => {
                    log::warn!(
                        "parent {} of '{}' is ambiguous; leaving it unlinked",
                        link.id,
                        project.relative_path.display()
                    );
                    None
                }
            }
        })
        .collect()
}

/// Inherit coordinates and merge property scopes, parents first.
fn inherit(forest: &mut Forest) {
    for idx in forest.parents_first_order() {
        let Some(parent_idx) = forest.parent(idx).filter(|&p| p != idx) else {
            let own = forest.projects[idx].properties.clone();
            forest.projects[idx].effective_properties = own;
            continue;
        };

        let parent = &forest.projects[parent_idx];
        let parent_id = parent.id();
        let parent_group = parent.group_id.clone();
        let parent_version = parent.version.clone();
        let mut effective = parent.effective_properties.clone();

        let project = &mut forest.projects[idx];
        effective.extend(project.properties.clone());
        project.effective_properties = effective;

        if project.group_id.is_none() {
            project.group_id = parent_group;
        }
        if project.version.is_none() {
            project.version = parent_version;
        }
        if let Some(link) = project.parent.as_mut() {
            link.id = parent_id;
        }
    }
}

fn index_projects(forest: &mut Forest) -> Result<(), ForestError> {
    let mut index: HashMap<ProjectId, usize> = HashMap::with_capacity(forest.projects.len());
    for (i, project) in forest.projects.iter().enumerate() {
        let id = project.id();
        if let Some(&first) = index.get(&id) {
            return Err(ForestError::DuplicateProject {
                id,
                first: forest.projects[first].relative_path.clone(),
                second: project.relative_path.clone(),
            });
        }
        index.insert(id, i);
    }
    forest.index = index;
    Ok(())
}

/// Replace raw dependency versions with their resolved form.
fn resolve_dependency_versions(projects: &mut [Project]) {
    for project in projects.iter_mut() {
        let (dependencies, managed) = {
            let scope = PropertyScope::new(project);
            let resolve_all = |deps: &[Dependency]| -> Vec<Dependency> {
                deps.iter()
                    .map(|d| d.with_version(scope.resolve_opt(d.version.as_deref())))
                    .collect()
            };
            (
                resolve_all(&project.dependencies),
                resolve_all(&project.managed_dependencies),
            )
        };
        project.dependencies = dependencies;
        project.managed_dependencies = managed;
    }
}
