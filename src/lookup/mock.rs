//! lookup::mock
//!
//! Mock version lookup for deterministic testing.
//!
//! # Example
//!
//! ```
//! use pomlens::core::types::Coordinate;
//! use pomlens::lookup::mock::{MockLookup, LookupCall};
//! use pomlens::lookup::VersionLookup;
//!
//! # tokio_test::block_on(async {
//! let coordinate = Coordinate::new("org.slf4j", "slf4j-api");
//! let lookup = MockLookup::new().with_version(coordinate.clone(), "2.0.16");
//!
//! let latest = lookup.latest_version(&coordinate, Some("1.7.36")).await.unwrap();
//! assert_eq!(latest.as_deref(), Some("2.0.16"));
//! assert_eq!(lookup.calls(), vec![LookupCall::Dependency(coordinate)]);
//! # });
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::traits::{LookupError, VersionLookup};
use crate::core::types::Coordinate;

/// Mock lookup. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockLookup {
    inner: Arc<Mutex<MockLookupInner>>,
}

#[derive(Debug, Default)]
struct MockLookupInner {
    versions: HashMap<Coordinate, String>,
    failures: HashMap<Coordinate, LookupError>,
    delay: Option<Duration>,
    calls: Vec<LookupCall>,
}

/// Recorded query for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupCall {
    Dependency(Coordinate),
    Parent(Coordinate),
}

impl MockLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `version` for `coordinate`.
    pub fn with_version(self, coordinate: Coordinate, version: &str) -> Self {
        self.with_inner(|inner| {
            inner.versions.insert(coordinate, version.to_string());
        })
    }

    /// Fail every query for `coordinate` with `error`.
    pub fn fail_on(self, coordinate: Coordinate, error: LookupError) -> Self {
        self.with_inner(|inner| {
            inner.failures.insert(coordinate, error);
        })
    }

    /// Sleep before answering each query.
    pub fn with_delay(self, delay: Duration) -> Self {
        self.with_inner(|inner| inner.delay = Some(delay))
    }

    /// Queries received so far, in arrival order.
    pub fn calls(&self) -> Vec<LookupCall> {
        self.inner
            .lock()
            .map(|inner| inner.calls.clone())
            .unwrap_or_default()
    }

    fn with_inner(self, f: impl FnOnce(&mut MockLookupInner)) -> Self {
        if let Ok(mut inner) = self.inner.lock() {
            f(&mut inner);
        }
        self
    }

    async fn answer(&self, call: LookupCall) -> Result<Option<String>, LookupError> {
        let coordinate = match &call {
            LookupCall::Dependency(c) | LookupCall::Parent(c) => c.clone(),
        };

        let (delay, result) = {
            let mut inner = self
                .inner
                .lock()
                .map_err(|_| LookupError::Network("mock lookup state poisoned".into()))?;
            inner.calls.push(call);
            let result = match inner.failures.get(&coordinate) {
                Some(error) => Err(error.clone()),
                None => Ok(inner.versions.get(&coordinate).cloned()),
            };
            (inner.delay, result)
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        result
    }
}

#[async_trait]
impl VersionLookup for MockLookup {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn latest_version(
        &self,
        coordinate: &Coordinate,
        _current: Option<&str>,
    ) -> Result<Option<String>, LookupError> {
        self.answer(LookupCall::Dependency(coordinate.clone())).await
    }

    async fn latest_parent_version(
        &self,
        coordinate: &Coordinate,
    ) -> Result<Option<String>, LookupError> {
        self.answer(LookupCall::Parent(coordinate.clone())).await
    }
}
