//! lookup::offline
//!
//! Backend that never reaches the network and knows no versions.

use async_trait::async_trait;

use super::traits::{LookupError, VersionLookup};
use crate::core::types::Coordinate;

#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineLookup;

#[async_trait]
impl VersionLookup for OfflineLookup {
    fn name(&self) -> &'static str {
        "offline"
    }

    async fn latest_version(
        &self,
        _coordinate: &Coordinate,
        _current: Option<&str>,
    ) -> Result<Option<String>, LookupError> {
        Ok(None)
    }

    async fn latest_parent_version(
        &self,
        _coordinate: &Coordinate,
    ) -> Result<Option<String>, LookupError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn always_absent() {
        let lookup = OfflineLookup;
        let coordinate = Coordinate::new("a", "b");
        assert_eq!(lookup.latest_version(&coordinate, Some("1")).await.unwrap(), None);
        assert_eq!(lookup.latest_parent_version(&coordinate).await.unwrap(), None);
    }
}
