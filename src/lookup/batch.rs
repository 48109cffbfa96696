//! lookup::batch
//!
//! Bounded concurrent update checks over a whole build.
//!
//! One query is issued per consolidated dependency and one per distinct
//! external parent. At most `concurrency` queries are in flight at once,
//! and each is cut off after `timeout`. A failed or timed-out query is
//! logged and reported as "no newer version known"; it never fails the
//! batch.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use super::factory::DEFAULT_TIMEOUT;
use super::traits::{LookupError, VersionLookup};
use crate::analysis::ConsolidatedDependencies;
use crate::core::forest::Forest;
use crate::core::properties::is_unresolved;
use crate::core::types::Coordinate;

/// Default number of queries in flight.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// What a checked coordinate is used as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateKind {
    Dependency,
    Parent,
}

impl std::fmt::Display for UpdateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpdateKind::Dependency => write!(f, "dependency"),
            UpdateKind::Parent => write!(f, "parent"),
        }
    }
}

/// Result of one update query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateCandidate {
    pub coordinate: Coordinate,
    pub kind: UpdateKind,
    pub current: String,
    /// Newest known version; `None` when unknown or the query failed.
    pub latest: Option<String>,
}

impl UpdateCandidate {
    /// Whether a different version than the current one is available.
    pub fn is_outdated(&self) -> bool {
        self.latest
            .as_deref()
            .is_some_and(|latest| latest != self.current)
    }
}

#[derive(Debug, Clone)]
pub struct UpdateOptions {
    pub concurrency: usize,
    pub timeout: Duration,
    /// Coordinates never queried.
    pub ignore: Vec<Coordinate>,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout: DEFAULT_TIMEOUT,
            ignore: Vec::new(),
        }
    }
}

/// Runs update queries through a [`VersionLookup`].
pub struct UpdateChecker {
    lookup: Arc<dyn VersionLookup>,
    options: UpdateOptions,
}

impl UpdateChecker {
    pub fn new(lookup: Arc<dyn VersionLookup>, options: UpdateOptions) -> Self {
        Self { lookup, options }
    }

    /// The queries a check would issue, in report order.
    ///
    /// Dependencies come first, sorted by coordinate, then external
    /// parents in discovery order. Dependencies without a version, with an
    /// empty one or with an unresolved placeholder are left out, as are
    /// ignored coordinates.
    pub fn plan(
        &self,
        forest: &Forest,
        consolidated: &ConsolidatedDependencies,
    ) -> Vec<UpdateCandidate> {
        let mut planned: Vec<UpdateCandidate> = Vec::new();

        for resolved in consolidated.iter() {
            let dependency = &resolved.dependency;
            let version = match dependency.version.as_deref() {
                Some(version) if dependency.has_resolved_version() => version,
                _ => {
                    log::debug!("skipping {}: no resolved version", dependency);
                    continue;
                }
            };
            let coordinate = dependency.coordinate();
            if self.is_ignored(&coordinate) {
                continue;
            }
            planned.push(UpdateCandidate {
                coordinate,
                kind: UpdateKind::Dependency,
                current: version.to_string(),
                latest: None,
            });
        }

        for (_, link) in forest.external_parents() {
            let coordinate = link.id.coordinate();
            let already = planned
                .iter()
                .any(|c| c.kind == UpdateKind::Parent && c.coordinate == coordinate);
            if already || self.is_ignored(&coordinate) || is_unresolved(&link.id.version) {
                continue;
            }
            planned.push(UpdateCandidate {
                coordinate,
                kind: UpdateKind::Parent,
                current: link.id.version.clone(),
                latest: None,
            });
        }
        planned
    }

    /// Query every planned coordinate and fill in `latest`.
    pub async fn check(
        &self,
        forest: &Forest,
        consolidated: &ConsolidatedDependencies,
    ) -> Vec<UpdateCandidate> {
        let mut candidates = self.plan(forest, consolidated);
        let semaphore = Arc::new(Semaphore::new(self.options.concurrency.max(1)));
        let mut tasks = JoinSet::new();

        for (slot, candidate) in candidates.iter().enumerate() {
            let lookup = Arc::clone(&self.lookup);
            let semaphore = Arc::clone(&semaphore);
            let timeout = self.options.timeout;
            let coordinate = candidate.coordinate.clone();
            let kind = candidate.kind;
            let current = candidate.current.clone();

            tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return (slot, None);
                };
                let query = async {
                    match kind {
                        UpdateKind::Dependency => {
                            lookup.latest_version(&coordinate, Some(current.as_str())).await
                        }
                        UpdateKind::Parent => lookup.latest_parent_version(&coordinate).await,
                    }
                };
                let result = match tokio::time::timeout(timeout, query).await {
                    Ok(result) => result,
                    Err(_) => Err(LookupError::Timeout(coordinate.to_string())),
                };
                match result {
                    Ok(latest) => (slot, latest),
                    Err(e) => {
                        log::warn!("{} lookup for {} failed: {}", kind, coordinate, e);
                        (slot, None)
                    }
                }
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((slot, latest)) => {
                    if let Some(candidate) = candidates.get_mut(slot) {
                        candidate.latest = latest;
                    }
                }
                Err(e) => log::warn!("lookup task failed: {}", e),
            }
        }
        candidates
    }

    fn is_ignored(&self, coordinate: &Coordinate) -> bool {
        self.options.ignore.contains(coordinate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::resolve_consolidated;
    use crate::core::forest::build_forest;
    use crate::core::types::{Dependency, ParentReference, RawDescriptor};
    use crate::loader::MemoryLoader;
    use crate::lookup::mock::{LookupCall, MockLookup};

    fn forest() -> Forest {
        let loader = MemoryLoader::new().with(
            "",
            RawDescriptor::new(Some("g"), "app", Some("1"))
                .with_parent(ParentReference::new(
                    "org.springframework.boot",
                    "starter-parent",
                    Some("3.1.0"),
                ))
                .with_property("jackson.version", "2.15.0")
                .with_dependency(Dependency::new("org.slf4j", "slf4j-api", Some("1.7.36")))
                .with_dependency(Dependency::new(
                    "com.fasterxml.jackson.core",
                    "jackson-databind",
                    Some("${jackson.version}"),
                ))
                .with_dependency(Dependency::new("x", "missing", Some("${nope}")))
                .with_dependency(Dependency::new("x", "versionless", None))
                .with_dependency(Dependency::new("x", "blank", Some(""))),
        );
        build_forest(loader.root().unwrap(), &loader).unwrap()
    }

    fn checker(lookup: MockLookup, options: UpdateOptions) -> UpdateChecker {
        UpdateChecker::new(Arc::new(lookup), options)
    }

    #[test]
    fn plan_skips_versionless_and_unresolved() {
        let forest = forest();
        let plan = checker(MockLookup::new(), UpdateOptions::default())
            .plan(&forest, &resolve_consolidated(&forest));

        let planned: Vec<String> = plan
            .iter()
            .map(|c| format!("{} {} {}", c.kind, c.coordinate, c.current))
            .collect();
        assert_eq!(
            planned,
            vec![
                "dependency com.fasterxml.jackson.core:jackson-databind 2.15.0",
                "dependency org.slf4j:slf4j-api 1.7.36",
                "parent org.springframework.boot:starter-parent 3.1.0",
            ]
        );
    }

    #[test]
    fn plan_honors_ignore_list() {
        let forest = forest();
        let options = UpdateOptions {
            ignore: vec![Coordinate::new("org.slf4j", "slf4j-api")],
            ..UpdateOptions::default()
        };
        let plan =
            checker(MockLookup::new(), options).plan(&forest, &resolve_consolidated(&forest));
        assert!(plan.iter().all(|c| c.coordinate.artifact_id != "slf4j-api"));
    }

    #[tokio::test]
    async fn check_fills_latest_versions() {
        let forest = forest();
        let lookup = MockLookup::new()
            .with_version(Coordinate::new("org.slf4j", "slf4j-api"), "2.0.16")
            .with_version(
                Coordinate::new("org.springframework.boot", "starter-parent"),
                "3.1.0",
            );
        let results = checker(lookup.clone(), UpdateOptions::default())
            .check(&forest, &resolve_consolidated(&forest))
            .await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].latest, None);
        assert_eq!(results[1].latest.as_deref(), Some("2.0.16"));
        assert!(results[1].is_outdated());
        assert!(!results[2].is_outdated());
        assert!(lookup.calls().contains(&LookupCall::Parent(Coordinate::new(
            "org.springframework.boot",
            "starter-parent"
        ))));
    }

    #[tokio::test]
    async fn failures_degrade_to_absence() {
        let forest = forest();
        let lookup = MockLookup::new()
            .with_version(Coordinate::new("org.slf4j", "slf4j-api"), "2.0.16")
            .fail_on(
                Coordinate::new("com.fasterxml.jackson.core", "jackson-databind"),
                LookupError::Network("connection refused".into()),
            );
        let results = checker(lookup, UpdateOptions::default())
            .check(&forest, &resolve_consolidated(&forest))
            .await;

        assert_eq!(results[0].latest, None);
        assert_eq!(results[1].latest.as_deref(), Some("2.0.16"));
    }

    #[tokio::test]
    async fn slow_lookups_time_out() {
        let forest = forest();
        let lookup = MockLookup::new()
            .with_version(Coordinate::new("org.slf4j", "slf4j-api"), "2.0.16")
            .with_delay(Duration::from_secs(5));
        let options = UpdateOptions {
            concurrency: 2,
            timeout: Duration::from_millis(20),
            ignore: Vec::new(),
        };
        let results = checker(lookup, options)
            .check(&forest, &resolve_consolidated(&forest))
            .await;

        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|c| c.latest.is_none()));
    }

    #[tokio::test]
    async fn zero_concurrency_still_runs() {
        let forest = forest();
        let lookup = MockLookup::new();
        let options = UpdateOptions {
            concurrency: 0,
            ..UpdateOptions::default()
        };
        checker(lookup.clone(), options)
            .check(&forest, &resolve_consolidated(&forest))
            .await;
        assert_eq!(lookup.calls().len(), 3);
    }
}
