//! lookup::maven_central
//!
//! Version lookup against a Maven-layout HTTP repository.
//!
//! Each query fetches
//! `<base>/<group path>/<artifactId>/maven-metadata.xml`, where the group
//! path is the groupId with dots replaced by slashes. The `<release>`
//! element is preferred; when it is missing the newest entry of
//! `<versions>` that is not a snapshot is used. A 404 means the coordinate
//! is not published there and yields `Ok(None)`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use super::traits::{LookupError, VersionLookup};
use crate::core::types::Coordinate;

/// Default repository root.
pub const DEFAULT_BASE_URL: &str = "https://repo.maven.apache.org/maven2";

const SNAPSHOT_SUFFIX: &str = "-SNAPSHOT";

/// HTTP backend for Maven Central or any mirror with the same layout.
#[derive(Debug, Clone)]
pub struct MavenCentralLookup {
    client: Client,
    base_url: String,
}

#[derive(Debug, Default, Deserialize)]
struct MetadataXml {
    #[serde(default)]
    versioning: Option<VersioningXml>,
}

#[derive(Debug, Default, Deserialize)]
struct VersioningXml {
    #[serde(default)]
    release: Option<String>,
    #[serde(default)]
    versions: Option<VersionsXml>,
}

#[derive(Debug, Default, Deserialize)]
struct VersionsXml {
    #[serde(default)]
    version: Vec<String>,
}

impl MavenCentralLookup {
    /// Create a backend rooted at `base_url` (or Maven Central).
    ///
    /// `timeout` bounds each HTTP request.
    pub fn new(base_url: Option<&str>, timeout: Duration) -> Result<Self, LookupError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pomlens/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LookupError::Network(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the metadata document for a coordinate.
    pub fn metadata_url(&self, coordinate: &Coordinate) -> String {
        format!(
            "{}/{}/{}/maven-metadata.xml",
            self.base_url,
            coordinate.group_id.replace('.', "/"),
            coordinate.artifact_id
        )
    }

    async fn fetch_latest(&self, coordinate: &Coordinate) -> Result<Option<String>, LookupError> {
        let url = self.metadata_url(coordinate);
        log::debug!("GET {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                LookupError::Timeout(coordinate.to_string())
            } else {
                LookupError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(LookupError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;
        latest_from_metadata(&body).map_err(|message| LookupError::Parse {
            coordinate: coordinate.to_string(),
            message,
        })
    }
}

/// Pick the newest release from a `maven-metadata.xml` document.
pub fn latest_from_metadata(xml: &str) -> Result<Option<String>, String> {
    let metadata: MetadataXml = quick_xml::de::from_str(xml).map_err(|e| e.to_string())?;
    let Some(versioning) = metadata.versioning else {
        return Ok(None);
    };

    let release = versioning
        .release
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());
    if release.is_some() {
        return Ok(release);
    }

    Ok(versioning.versions.and_then(|versions| {
        versions
            .version
            .into_iter()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty() && !v.ends_with(SNAPSHOT_SUFFIX))
            .last()
    }))
}

#[async_trait]
impl VersionLookup for MavenCentralLookup {
    fn name(&self) -> &'static str {
        "maven-central"
    }

    async fn latest_version(
        &self,
        coordinate: &Coordinate,
        _current: Option<&str>,
    ) -> Result<Option<String>, LookupError> {
        self.fetch_latest(coordinate).await
    }

    async fn latest_parent_version(
        &self,
        coordinate: &Coordinate,
    ) -> Result<Option<String>, LookupError> {
        self.fetch_latest(coordinate).await
    }
}
