//! Integration tests for loading real `pom.xml` trees.
//!
//! These tests write multi-module builds to a temporary directory and
//! exercise the full flow: load → forest → properties → analysis.

use assert_fs::prelude::*;
use assert_fs::TempDir;

use pomlens::analysis::{visible_dependencies, Analysis};
use pomlens::core::forest::{build_forest_at, ForestError};
use pomlens::core::types::Coordinate;
use pomlens::loader::{LoaderError, PomLoader};

// =============================================================================
// Test Fixtures
// =============================================================================

const ROOT_POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
  <modelVersion>4.0.0</modelVersion>
  <groupId>com.example</groupId>
  <artifactId>shop</artifactId>
  <version>1.4.0</version>
  <packaging>pom</packaging>

  <properties>
    <slf4j.version>2.0.9</slf4j.version>
    <junit.version>5.10.0</junit.version>
  </properties>

  <modules>
    <module>core</module>
    <module>web</module>
  </modules>

  <dependencyManagement>
    <dependencies>
      <dependency>
        <groupId>org.slf4j</groupId>
        <artifactId>slf4j-api</artifactId>
        <version>${slf4j.version}</version>
      </dependency>
      <dependency>
        <groupId>com.example</groupId>
        <artifactId>shop-core</artifactId>
        <version>${project.version}</version>
      </dependency>
    </dependencies>
  </dependencyManagement>
</project>
"#;

const CORE_POM: &str = r#"<project>
  <parent>
    <groupId>com.example</groupId>
    <artifactId>shop</artifactId>
    <version>1.4.0</version>
  </parent>
  <artifactId>shop-core</artifactId>

  <properties>
    <slf4j.version>1.7.36</slf4j.version>
  </properties>

  <dependencies>
    <dependency>
      <groupId>org.slf4j</groupId>
      <artifactId>slf4j-api</artifactId>
      <version>${slf4j.version}</version>
    </dependency>
    <dependency>
      <groupId>org.junit.jupiter</groupId>
      <artifactId>junit-jupiter</artifactId>
      <version>${junit.version}</version>
      <scope>test</scope>
    </dependency>
  </dependencies>
</project>
"#;

const WEB_POM: &str = r#"<project>
  <parent>
    <groupId>com.example</groupId>
    <artifactId>shop</artifactId>
    <version>1.4.0</version>
  </parent>
  <artifactId>shop-web</artifactId>

  <dependencies>
    <dependency>
      <groupId>com.example</groupId>
      <artifactId>shop-core</artifactId>
    </dependency>
    <dependency>
      <groupId>org.slf4j</groupId>
      <artifactId>slf4j-api</artifactId>
      <version>${slf4j.version}</version>
    </dependency>
  </dependencies>
</project>
"#;

/// Write the three-module shop build.
fn shop_build() -> TempDir {
    let dir = TempDir::new().unwrap();
    dir.child("pom.xml").write_str(ROOT_POM).unwrap();
    dir.child("core/pom.xml").write_str(CORE_POM).unwrap();
    dir.child("web/pom.xml").write_str(WEB_POM).unwrap();
    dir
}

// =============================================================================
// Forest construction
// =============================================================================

#[test]
fn builds_forest_in_discovery_order() {
    let dir = shop_build();
    let forest = build_forest_at(&PomLoader::new(dir.path()), "pom.xml").unwrap();

    let ids: Vec<String> = forest
        .projects()
        .iter()
        .map(|p| p.id().to_string())
        .collect();
    assert_eq!(
        ids,
        vec![
            "com.example:shop:1.4.0",
            "com.example:shop-core:1.4.0",
            "com.example:shop-web:1.4.0",
        ]
    );
    assert_eq!(forest.parent(1), Some(0));
    assert_eq!(forest.parent(2), Some(0));
    assert_eq!(forest.children(0), &[1, 2]);
}

#[test]
fn child_properties_shadow_parent() {
    let dir = shop_build();
    let forest = build_forest_at(&PomLoader::new(dir.path()), "pom.xml").unwrap();

    let core = &forest.projects()[1];
    assert_eq!(core.effective_properties["slf4j.version"], "1.7.36");
    assert_eq!(core.effective_properties["junit.version"], "5.10.0");
    assert_eq!(core.dependencies[0].version.as_deref(), Some("1.7.36"));

    let web = &forest.projects()[2];
    assert_eq!(web.dependencies[1].version.as_deref(), Some("2.0.9"));
}

#[test]
fn managed_project_version_placeholder_resolves() {
    let dir = shop_build();
    let forest = build_forest_at(&PomLoader::new(dir.path()), "pom.xml").unwrap();

    let web_view = visible_dependencies(&forest, 2);
    let shop_core = web_view
        .iter()
        .find(|r| r.dependency.artifact_id == "shop-core")
        .unwrap();
    assert_eq!(shop_core.dependency.version.as_deref(), Some("1.4.0"));
    assert_eq!(shop_core.declared_by.artifact_id, "shop-web");
}

#[test]
fn missing_module_fails_with_path() {
    let dir = TempDir::new().unwrap();
    dir.child("pom.xml").write_str(ROOT_POM).unwrap();
    dir.child("core/pom.xml").write_str(CORE_POM).unwrap();

    let err = build_forest_at(&PomLoader::new(dir.path()), "pom.xml").unwrap_err();
    match err {
        ForestError::Descriptor { relative_path, source } => {
            assert_eq!(relative_path, "web");
            assert!(matches!(source, LoaderError::NotFound { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_module_fails_with_parse_error() {
    let dir = shop_build();
    dir.child("web/pom.xml")
        .write_str("<project><artifactId>web</artifactId>")
        .unwrap();

    let err = build_forest_at(&PomLoader::new(dir.path()), "pom.xml").unwrap_err();
    assert!(matches!(
        err,
        ForestError::Descriptor {
            source: LoaderError::Parse { .. },
            ..
        }
    ));
}

#[test]
fn explicit_descriptor_file_in_module_list() {
    let dir = TempDir::new().unwrap();
    dir.child("pom.xml")
        .write_str(
            "<project><groupId>g</groupId><artifactId>root</artifactId><version>1</version>\
             <modules><module>tools/build-tools.xml</module></modules></project>",
        )
        .unwrap();
    dir.child("tools/build-tools.xml")
        .write_str(
            "<project><groupId>g</groupId><artifactId>tools</artifactId>\
             <version>1</version></project>",
        )
        .unwrap();

    let forest = build_forest_at(&PomLoader::new(dir.path()), "pom.xml").unwrap();
    assert_eq!(forest.len(), 2);
    assert_eq!(
        forest.projects()[1].relative_path,
        std::path::PathBuf::from("tools/build-tools.xml")
    );
}

// =============================================================================
// Analysis over the loaded build
// =============================================================================

#[test]
fn analysis_reports_slf4j_disagreement() {
    let dir = shop_build();
    let forest = build_forest_at(&PomLoader::new(dir.path()), "pom.xml").unwrap();
    let analysis = Analysis::run(&forest);

    assert_eq!(analysis.inconsistencies.len(), 1);
    let slf4j = &analysis.inconsistencies[0];
    assert_eq!(slf4j.coordinate, Coordinate::new("org.slf4j", "slf4j-api"));
    assert_eq!(slf4j.versions["1.7.36"], vec!["shop-core"]);
    assert_eq!(slf4j.versions["2.0.9"], vec!["shop-web"]);
}

#[test]
fn analysis_consolidates_nearest_versions() {
    let dir = shop_build();
    let forest = build_forest_at(&PomLoader::new(dir.path()), "pom.xml").unwrap();
    let analysis = Analysis::run(&forest);

    let slf4j = analysis
        .consolidated
        .get(&Coordinate::new("org.slf4j", "slf4j-api"))
        .unwrap();
    // Both modules sit at depth 1; shop-core is discovered first.
    assert_eq!(slf4j.dependency.version.as_deref(), Some("1.7.36"));

    let junit = analysis
        .consolidated
        .get(&Coordinate::new("org.junit.jupiter", "junit-jupiter"))
        .unwrap();
    assert_eq!(junit.dependency.scope.as_deref(), Some("test"));
    assert_eq!(analysis.consolidated.len(), 3);
}

#[test]
fn usage_lists_versionless_declarations() {
    let dir = shop_build();
    let forest = build_forest_at(&PomLoader::new(dir.path()), "pom.xml").unwrap();
    let analysis = Analysis::run(&forest);

    assert_eq!(
        analysis.usage[&Coordinate::new("com.example", "shop-core")],
        vec!["shop-web"]
    );
    assert_eq!(
        analysis.usage[&Coordinate::new("org.slf4j", "slf4j-api")],
        vec!["shop-core", "shop-web"]
    );
}
