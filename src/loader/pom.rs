//! loader::pom
//!
//! Filesystem loader for Maven `pom.xml` descriptors.
//!
//! Only the elements the analysis needs are read: coordinates, packaging,
//! name, parent, properties, dependencies, dependency management and
//! modules. Everything else (build, profiles, reporting, ...) is ignored.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::traits::{DescriptorLoader, LoadedDescriptor, LoaderError};
use crate::core::paths::{descriptor_location, join_relative};
use crate::core::types::{Dependency, ParentReference, RawDescriptor};

/// Loads `pom.xml` files below a root directory.
#[derive(Debug, Clone)]
pub struct PomLoader {
    root: PathBuf,
}

impl PomLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory all relative paths are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DescriptorLoader for PomLoader {
    fn load(&self, base: &Path, relative_path: &str) -> Result<LoadedDescriptor, LoaderError> {
        let location = join_relative(base, relative_path);
        let (directory, file) = descriptor_location(&location);
        let absolute = self.root.join(&file);

        log::debug!("loading descriptor {}", absolute.display());

        let xml = fs::read_to_string(&absolute).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LoaderError::NotFound { path: file.clone() }
            } else {
                LoaderError::Io {
                    path: file.clone(),
                    source: e,
                }
            }
        })?;

        let descriptor = parse_pom(&xml).map_err(|e| LoaderError::Parse {
            path: file.clone(),
            message: e.to_string(),
        })?;

        Ok(LoadedDescriptor {
            directory,
            file,
            descriptor,
        })
    }
}

/// Parse the text of a `pom.xml` into a raw descriptor.
///
/// # Example
///
/// ```
/// use pomlens::loader::parse_pom;
///
/// let raw = parse_pom(r#"
///     <project>
///       <groupId>com.example</groupId>
///       <artifactId>app</artifactId>
///       <version>1.0.0</version>
///       <modules><module>core</module></modules>
///     </project>
/// "#).unwrap();
///
/// assert_eq!(raw.artifact_id.as_deref(), Some("app"));
/// assert_eq!(raw.modules, vec!["core".to_string()]);
/// ```
pub fn parse_pom(xml: &str) -> Result<RawDescriptor, quick_xml::DeError> {
    let pom: PomXml = quick_xml::de::from_str(xml)?;
    Ok(pom.into_descriptor())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PomXml {
    group_id: Option<String>,
    artifact_id: Option<String>,
    version: Option<String>,
    packaging: Option<String>,
    name: Option<String>,
    parent: Option<ParentXml>,
    properties: Option<BTreeMap<String, String>>,
    dependencies: Option<DependenciesXml>,
    dependency_management: Option<DependencyManagementXml>,
    modules: Option<ModulesXml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ParentXml {
    group_id: Option<String>,
    artifact_id: Option<String>,
    version: Option<String>,
    relative_path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DependenciesXml {
    dependency: Vec<DependencyXml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DependencyManagementXml {
    dependencies: Option<DependenciesXml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct DependencyXml {
    group_id: Option<String>,
    artifact_id: Option<String>,
    version: Option<String>,
    scope: Option<String>,
    optional: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ModulesXml {
    module: Vec<String>,
}

/// Trim a text node, treating blank values as absent.
fn text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl PomXml {
    fn into_descriptor(self) -> RawDescriptor {
        let parent = self.parent.and_then(ParentXml::into_reference);

        let properties = self
            .properties
            .unwrap_or_default()
            .into_iter()
            .map(|(k, v)| (k, v.trim().to_string()))
            .collect();

        let dependencies = self
            .dependencies
            .map(DependenciesXml::into_dependencies)
            .unwrap_or_default();

        let managed_dependencies = self
            .dependency_management
            .and_then(|dm| dm.dependencies)
            .map(DependenciesXml::into_dependencies)
            .unwrap_or_default();

        let modules = self
            .modules
            .map(|m| {
                m.module
                    .into_iter()
                    .filter_map(|path| text(Some(path)))
                    .collect()
            })
            .unwrap_or_default();

        RawDescriptor {
            group_id: text(self.group_id),
            artifact_id: text(self.artifact_id),
            version: text(self.version),
            packaging: text(self.packaging),
            name: text(self.name),
            parent,
            properties,
            dependencies,
            managed_dependencies,
            modules,
        }
    }
}

impl ParentXml {
    fn into_reference(self) -> Option<ParentReference> {
        Some(ParentReference {
            group_id: text(self.group_id)?,
            artifact_id: text(self.artifact_id)?,
            version: text(self.version),
            // Kept even when empty: an empty relativePath turns off the
            // file lookup for the parent.
            relative_path: self.relative_path.map(|p| p.trim().to_string()),
        })
    }
}

impl DependenciesXml {
    fn into_dependencies(self) -> Vec<Dependency> {
        self.dependency
            .into_iter()
            .filter_map(|d| {
                let group_id = text(d.group_id)?;
                let artifact_id = text(d.artifact_id)?;
                Some(Dependency {
                    group_id,
                    artifact_id,
                    version: text(d.version),
                    scope: text(d.scope),
                    optional: text(d.optional).and_then(|o| match o.as_str() {
                        "true" => Some(true),
                        "false" => Some(false),
                        _ => None,
                    }),
                    kind: text(d.kind),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
  <modelVersion>4.0.0</modelVersion>
  <parent>
    <groupId>com.example</groupId>
    <artifactId>root</artifactId>
    <version>1.0.0</version>
  </parent>
  <artifactId>service</artifactId>
  <packaging>jar</packaging>
  <name>Service</name>
  <properties>
    <jackson.version>2.15.2</jackson.version>
    <project.build.sourceEncoding>UTF-8</project.build.sourceEncoding>
  </properties>
  <dependencyManagement>
    <dependencies>
      <dependency>
        <groupId>org.springframework.boot</groupId>
        <artifactId>spring-boot-dependencies</artifactId>
        <version>3.1.0</version>
        <type>pom</type>
        <scope>import</scope>
      </dependency>
    </dependencies>
  </dependencyManagement>
  <dependencies>
    <dependency>
      <groupId>com.fasterxml.jackson.core</groupId>
      <artifactId>jackson-databind</artifactId>
      <version>${jackson.version}</version>
    </dependency>
    <dependency>
      <groupId>junit</groupId>
      <artifactId>junit</artifactId>
      <scope>test</scope>
      <optional>true</optional>
    </dependency>
  </dependencies>
  <build>
    <plugins>
      <plugin>
        <artifactId>maven-compiler-plugin</artifactId>
        <dependencies>
          <dependency>
            <groupId>ignored</groupId>
            <artifactId>ignored</artifactId>
          </dependency>
        </dependencies>
      </plugin>
    </plugins>
  </build>
</project>
"#;

    #[test]
    fn parses_full_descriptor() {
        let raw = parse_pom(FULL_POM).unwrap();

        assert_eq!(raw.group_id, None);
        assert_eq!(raw.artifact_id.as_deref(), Some("service"));
        assert_eq!(raw.packaging.as_deref(), Some("jar"));
        assert_eq!(raw.name.as_deref(), Some("Service"));

        let parent = raw.parent.unwrap();
        assert_eq!(parent.artifact_id, "root");
        assert_eq!(parent.version.as_deref(), Some("1.0.0"));
        assert_eq!(parent.relative_path, None);

        assert_eq!(
            raw.properties.get("jackson.version").map(String::as_str),
            Some("2.15.2")
        );

        assert_eq!(raw.dependencies.len(), 2);
        assert_eq!(
            raw.dependencies[0].version.as_deref(),
            Some("${jackson.version}")
        );
        assert_eq!(raw.dependencies[1].version, None);
        assert_eq!(raw.dependencies[1].scope.as_deref(), Some("test"));
        assert_eq!(raw.dependencies[1].optional, Some(true));

        assert_eq!(raw.managed_dependencies.len(), 1);
        assert_eq!(raw.managed_dependencies[0].kind.as_deref(), Some("pom"));
        assert_eq!(raw.managed_dependencies[0].scope.as_deref(), Some("import"));
    }

    #[test]
    fn minimal_descriptor_has_empty_collections() {
        let raw = parse_pom("<project><artifactId>solo</artifactId></project>").unwrap();
        assert!(raw.parent.is_none());
        assert!(raw.properties.is_empty());
        assert!(raw.dependencies.is_empty());
        assert!(raw.managed_dependencies.is_empty());
        assert!(raw.modules.is_empty());
    }

    #[test]
    fn modules_keep_declaration_order() {
        let raw = parse_pom(
            "<project><artifactId>agg</artifactId><modules>\
             <module>zeta</module><module>alpha</module><module> ../other </module>\
             </modules></project>",
        )
        .unwrap();
        assert_eq!(raw.modules, vec!["zeta", "alpha", "../other"]);
    }

    #[test]
    fn malformed_xml_is_an_error() {
        assert!(parse_pom("<project><artifactId>broken</project>").is_err());
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::TempDir::new().unwrap();
        let loader = PomLoader::new(dir.path());
        let err = loader.load(Path::new(""), "missing").unwrap_err();
        assert!(matches!(err, LoaderError::NotFound { .. }));
        assert_eq!(err.path(), Path::new("missing/pom.xml"));
    }

    #[test]
    fn loads_directory_and_explicit_file() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("core")).unwrap();
        fs::write(
            dir.path().join("core/pom.xml"),
            "<project><artifactId>core</artifactId></project>",
        )
        .unwrap();
        fs::write(
            dir.path().join("core/alt.xml"),
            "<project><artifactId>alt</artifactId></project>",
        )
        .unwrap();

        let loader = PomLoader::new(dir.path());

        let loaded = loader.load(Path::new(""), "core").unwrap();
        assert_eq!(loaded.directory, PathBuf::from("core"));
        assert_eq!(loaded.file, PathBuf::from("core/pom.xml"));
        assert_eq!(loaded.descriptor.artifact_id.as_deref(), Some("core"));

        let loaded = loader.load(Path::new("core"), "alt.xml").unwrap();
        assert_eq!(loaded.file, PathBuf::from("core/alt.xml"));
        assert_eq!(loaded.descriptor.artifact_id.as_deref(), Some("alt"));
    }
}
