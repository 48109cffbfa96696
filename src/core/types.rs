//! core::types
//!
//! Strong types for project descriptors and dependencies.
//!
//! # Types
//!
//! - [`Coordinate`] - Version-independent `groupId:artifactId` identity
//! - [`ProjectId`] - Full `groupId:artifactId:version` project identity
//! - [`Dependency`] - A declared dependency (direct or managed)
//! - [`ParentReference`] - A descriptor's pointer to its parent
//! - [`RawDescriptor`] - Unresolved descriptor as produced by a loader
//! - [`Project`] - A member of a built forest with inherited fields resolved
//!
//! # Equality
//!
//! Coordinates compare structurally with case-sensitive string comparison.
//! Two dependencies are the "same dependency" when their coordinates match,
//! regardless of version.
//!
//! # Examples
//!
//! ```
//! use pomlens::core::types::{Coordinate, Dependency};
//!
//! let a = Dependency::new("org.slf4j", "slf4j-api", Some("1.7.30"));
//! let b = Dependency::new("org.slf4j", "slf4j-api", Some("1.7.32"));
//!
//! assert!(a.same_dependency(&b));
//! assert_eq!(a.coordinate(), Coordinate::new("org.slf4j", "slf4j-api"));
//! assert_eq!(a.to_string(), "org.slf4j:slf4j-api:1.7.30");
//! ```

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid coordinate '{0}', expected groupId:artifactId")]
    InvalidCoordinate(String),
}

/// A version-independent dependency or project identity.
///
/// Serialized as its `groupId:artifactId` string so it can key JSON maps.
/// Ordered by that same string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Coordinate {
    pub group_id: String,
    pub artifact_id: String,
}

impl Ord for Coordinate {
    fn cmp(&self, other: &Self) -> Ordering {
        let key = |c: &Coordinate| {
            c.group_id
                .bytes()
                .chain(std::iter::once(b':'))
                .chain(c.artifact_id.bytes())
                .collect::<Vec<u8>>()
        };
        key(self)
            .cmp(&key(other))
            .then_with(|| self.group_id.cmp(&other.group_id))
    }
}

impl PartialOrd for Coordinate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Coordinate {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
        }
    }

    /// Parse a `groupId:artifactId` string.
    ///
    /// Returns `None` unless there are exactly two non-empty parts.
    ///
    /// ```
    /// use pomlens::core::types::Coordinate;
    ///
    /// let c = Coordinate::parse("org.slf4j:slf4j-api").unwrap();
    /// assert_eq!(c.artifact_id, "slf4j-api");
    /// assert!(Coordinate::parse("org.slf4j").is_none());
    /// assert!(Coordinate::parse("a:b:c").is_none());
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.split(':');
        let group = parts.next()?.trim();
        let artifact = parts.next()?.trim();
        if parts.next().is_some() || group.is_empty() || artifact.is_empty() {
            return None;
        }
        Some(Self::new(group, artifact))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}

impl TryFrom<String> for Coordinate {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s).ok_or(TypeError::InvalidCoordinate(s))
    }
}

impl From<Coordinate> for String {
    fn from(c: Coordinate) -> Self {
        c.to_string()
    }
}

/// Full project identity: coordinate plus version.
///
/// Missing parts are represented by empty strings once the forest has
/// applied inheritance; a root project without a groupId still gets an id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectId {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl ProjectId {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        }
    }

    /// The version-independent part of this id.
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(&self.group_id, &self.artifact_id)
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

/// A declared dependency.
///
/// A `None` version means the version is governed elsewhere, typically by a
/// dependency-management entry of the same project or an ancestor.
///
/// Dependencies are immutable once constructed; the `with_*` methods return
/// modified copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    pub group_id: String,
    pub artifact_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl Dependency {
    /// Create a dependency with only coordinate and version set.
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: Option<&str>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.map(str::to_string),
            scope: None,
            optional: None,
            kind: None,
        }
    }

    /// Set the scope (builder style, used by loaders and tests).
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Set the packaging type (builder style).
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Set the optional flag (builder style).
    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = Some(optional);
        self
    }

    /// Return a copy with the version replaced.
    pub fn with_version(&self, version: Option<String>) -> Self {
        Self {
            version,
            ..self.clone()
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(&self.group_id, &self.artifact_id)
    }

    /// Whether `other` names the same artifact, ignoring version.
    pub fn same_dependency(&self, other: &Dependency) -> bool {
        self.group_id == other.group_id && self.artifact_id == other.artifact_id
    }

    /// Fill the fields this declaration leaves open from a farther one.
    ///
    /// Fields already set on `self` are kept; only `None` fields are taken
    /// from `fallback`.
    pub fn with_defaults_from(&self, fallback: &Dependency) -> Self {
        Self {
            group_id: self.group_id.clone(),
            artifact_id: self.artifact_id.clone(),
            version: self.version.clone().or_else(|| fallback.version.clone()),
            scope: self.scope.clone().or_else(|| fallback.scope.clone()),
            optional: self.optional.or(fallback.optional),
            kind: self.kind.clone().or_else(|| fallback.kind.clone()),
        }
    }

    /// Whether the version is present and free of placeholders.
    pub fn has_resolved_version(&self) -> bool {
        self.version
            .as_deref()
            .is_some_and(|v| !v.is_empty() && !v.contains("${"))
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{}:{}:{}", self.group_id, self.artifact_id, v),
            None => write!(f, "{}:{}", self.group_id, self.artifact_id),
        }
    }
}

/// A descriptor's reference to its parent descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentReference {
    pub group_id: String,
    pub artifact_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Path used to locate the parent descriptor; informational once the
    /// forest is built.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_path: Option<String>,
}

impl ParentReference {
    /// Default relative path used when the descriptor does not declare one.
    pub const DEFAULT_RELATIVE_PATH: &'static str = "../pom.xml";

    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: Option<&str>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.map(str::to_string),
            relative_path: None,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(&self.group_id, &self.artifact_id)
    }

}

impl fmt::Display for ParentReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.group_id,
            self.artifact_id,
            self.version.as_deref().unwrap_or("")
        )
    }
}

/// An unresolved descriptor as produced by a [`crate::loader::DescriptorLoader`].
///
/// Values may contain `${...}` placeholders; nothing is inherited yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDescriptor {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub packaging: Option<String>,
    pub name: Option<String>,
    pub parent: Option<ParentReference>,
    pub properties: BTreeMap<String, String>,
    pub dependencies: Vec<Dependency>,
    pub managed_dependencies: Vec<Dependency>,
    pub modules: Vec<String>,
}

impl RawDescriptor {
    /// Start a descriptor with the given identity (builder style).
    pub fn new(group_id: Option<&str>, artifact_id: &str, version: Option<&str>) -> Self {
        Self {
            group_id: group_id.map(str::to_string),
            artifact_id: Some(artifact_id.to_string()),
            version: version.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn with_parent(mut self, parent: ParentReference) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    pub fn with_managed_dependency(mut self, dependency: Dependency) -> Self {
        self.managed_dependencies.push(dependency);
        self
    }

    pub fn with_module(mut self, path: impl Into<String>) -> Self {
        self.modules.push(path.into());
        self
    }

    pub fn with_packaging(mut self, packaging: impl Into<String>) -> Self {
        self.packaging = Some(packaging.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Weak link from a project to its parent.
///
/// The forest owns every project; a child only records the parent's
/// identity and where it was looked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentLink {
    pub id: ProjectId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_path: Option<String>,
}

impl ParentLink {
    /// Where to look for the parent descriptor, relative to the child's
    /// directory.
    ///
    /// An absent relativePath means `../pom.xml`. An empty one turns the
    /// file lookup off.
    pub fn lookup_path(&self) -> Option<&str> {
        match self.relative_path.as_deref().map(str::trim) {
            None => Some(ParentReference::DEFAULT_RELATIVE_PATH),
            Some("") => None,
            Some(path) => Some(path),
        }
    }
}

/// A project inside a built [`crate::core::forest::Forest`].
///
/// Coordinate fields hold their inherited values. `dependencies` and
/// `managed_dependencies` carry property-resolved versions, which may still
/// contain `${...}` when a placeholder could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub packaging: Option<String>,
    pub name: Option<String>,
    /// Path of the descriptor file relative to the forest root directory.
    pub relative_path: PathBuf,
    /// Properties declared by this descriptor, unresolved.
    pub properties: BTreeMap<String, String>,
    /// Ancestor properties overlaid with this project's own declarations.
    pub effective_properties: BTreeMap<String, String>,
    pub dependencies: Vec<Dependency>,
    pub managed_dependencies: Vec<Dependency>,
    pub modules: Vec<String>,
    pub parent: Option<ParentLink>,
}

impl Project {
    /// Create a detached project with no properties, dependencies or parent.
    pub fn new(group_id: Option<&str>, artifact_id: &str, version: Option<&str>) -> Self {
        Self {
            group_id: group_id.map(str::to_string),
            artifact_id: Some(artifact_id.to_string()),
            version: version.map(str::to_string),
            packaging: None,
            name: None,
            relative_path: PathBuf::new(),
            properties: BTreeMap::new(),
            effective_properties: BTreeMap::new(),
            dependencies: Vec::new(),
            managed_dependencies: Vec::new(),
            modules: Vec::new(),
            parent: None,
        }
    }

    /// The project's full identity; absent parts become empty strings.
    pub fn id(&self) -> ProjectId {
        ProjectId::new(
            self.group_id.clone().unwrap_or_default(),
            self.artifact_id.clone().unwrap_or_default(),
            self.version.clone().unwrap_or_default(),
        )
    }

    pub fn coordinate(&self) -> Coordinate {
        self.id().coordinate()
    }

    /// Name used for this project in module-level reports.
    ///
    /// The artifactId, or the descriptor path when the artifactId is absent.
    pub fn module_name(&self) -> String {
        match &self.artifact_id {
            Some(a) if !a.is_empty() => a.clone(),
            _ => self.relative_path.display().to_string(),
        }
    }

    /// Direct dependencies followed by managed ones.
    ///
    /// Order is preserved and nothing is deduplicated; consumers apply
    /// their own policy.
    pub fn all_dependencies(&self) -> impl Iterator<Item = &Dependency> {
        self.dependencies
            .iter()
            .chain(self.managed_dependencies.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_display_and_order() {
        let a = Coordinate::new("a.group", "z");
        let b = Coordinate::new("b.group", "a");
        assert_eq!(a.to_string(), "a.group:z");
        assert!(a < b);
    }

    #[test]
    fn coordinate_order_follows_display_string() {
        let mut coordinates = vec![
            Coordinate::new("org.apache", "x"),
            Coordinate::new("org.apache.commons", "y"),
            Coordinate::new("org", "z"),
        ];
        coordinates.sort();
        let rendered: Vec<String> = coordinates.iter().map(|c| c.to_string()).collect();
        assert_eq!(rendered, vec!["org.apache.commons:y", "org.apache:x", "org:z"]);
    }

    #[test]
    fn coordinate_order_is_consistent_with_equality() {
        let a = Coordinate::new("a:b", "c");
        let b = Coordinate::new("a", "b:c");
        assert_ne!(a, b);
        assert_ne!(a.cmp(&b), Ordering::Equal);
    }

    #[test]
    fn coordinate_equality_is_case_sensitive() {
        assert_ne!(
            Coordinate::new("org.Example", "lib"),
            Coordinate::new("org.example", "lib")
        );
    }

    #[test]
    fn coordinate_parse_trims_parts() {
        assert_eq!(
            Coordinate::parse(" g : a "),
            Some(Coordinate::new("g", "a"))
        );
        assert!(Coordinate::parse(":a").is_none());
    }

    #[test]
    fn coordinate_serializes_as_string() {
        let c = Coordinate::new("org.slf4j", "slf4j-api");
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "\"org.slf4j:slf4j-api\"");
        let back: Coordinate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
        assert!(serde_json::from_str::<Coordinate>("\"nope\"").is_err());
    }

    #[test]
    fn defaults_only_fill_missing_fields() {
        let near = Dependency::new("g", "a", None).with_scope("test");
        let far = Dependency::new("g", "a", Some("1.0"))
            .with_scope("compile")
            .with_kind("jar");

        let merged = near.with_defaults_from(&far);
        assert_eq!(merged.version.as_deref(), Some("1.0"));
        assert_eq!(merged.scope.as_deref(), Some("test"));
        assert_eq!(merged.kind.as_deref(), Some("jar"));
        assert_eq!(merged.optional, None);
    }

    #[test]
    fn resolved_version_check() {
        assert!(Dependency::new("g", "a", Some("1.0")).has_resolved_version());
        assert!(!Dependency::new("g", "a", Some("${v}")).has_resolved_version());
        assert!(!Dependency::new("g", "a", None).has_resolved_version());
    }

    #[test]
    fn all_dependencies_keeps_direct_then_managed_without_dedup() {
        let mut project = Project::new(Some("g"), "p", Some("1"));
        project.dependencies.push(Dependency::new("x", "y", Some("2")));
        project
            .managed_dependencies
            .push(Dependency::new("x", "y", Some("1")));

        let versions: Vec<_> = project
            .all_dependencies()
            .map(|d| d.version.as_deref().unwrap())
            .collect();
        assert_eq!(versions, vec!["2", "1"]);
    }

    #[test]
    fn module_name_falls_back_to_path() {
        let mut project = Project::new(None, "", None);
        project.relative_path = PathBuf::from("sub/pom.xml");
        assert_eq!(project.module_name(), "sub/pom.xml");
    }

    #[test]
    fn parent_lookup_path() {
        let mut link = ParentLink {
            id: ProjectId::new("g", "root", "1"),
            relative_path: None,
        };
        assert_eq!(link.lookup_path(), Some("../pom.xml"));
        link.relative_path = Some("../../pom.xml".into());
        assert_eq!(link.lookup_path(), Some("../../pom.xml"));
        link.relative_path = Some(" ".into());
        assert_eq!(link.lookup_path(), None);
    }
}
