//! In-memory [`GeographySource`] for offline runs and tests.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::GeographyError;
use crate::types::{DivisionName, RegionCode};
use crate::GeographySource;

/// Answers lookups from fixed tables. Regions without an entry fail with
/// [`GeographyError::Unavailable`], which mirrors the live service rejecting
/// the `"0"` sentinel.
#[derive(Debug, Clone, Default)]
pub struct StaticGeography {
    regions: Vec<RegionCode>,
    divisions: HashMap<RegionCode, Vec<DivisionName>>,
    delays: HashMap<RegionCode, Duration>,
    fail_regions: bool,
}

impl StaticGeography {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_regions<I, R>(mut self, regions: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<RegionCode>,
    {
        self.regions = regions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_divisions<I, D>(mut self, region: impl Into<RegionCode>, divisions: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<DivisionName>,
    {
        self.divisions
            .insert(region.into(), divisions.into_iter().map(Into::into).collect());
        self
    }

    /// Delay the division answer for `region`; used to force out-of-order
    /// completions.
    pub fn with_delay(mut self, region: impl Into<RegionCode>, delay: Duration) -> Self {
        self.delays.insert(region.into(), delay);
        self
    }

    /// Make the region lookup fail.
    pub fn failing_regions(mut self) -> Self {
        self.fail_regions = true;
        self
    }
}

#[async_trait]
impl GeographySource for StaticGeography {
    async fn list_regions(&self) -> Result<Vec<RegionCode>, GeographyError> {
        if self.fail_regions {
            return Err(GeographyError::Unavailable {
                endpoint: "GET /localidades/estados".into(),
            });
        }
        Ok(self.regions.clone())
    }

    async fn list_divisions(
        &self,
        region: &RegionCode,
    ) -> Result<Vec<DivisionName>, GeographyError> {
        if let Some(delay) = self.delays.get(region) {
            tokio::time::sleep(*delay).await;
        }
        self.divisions
            .get(region)
            .cloned()
            .ok_or_else(|| GeographyError::Unavailable {
                endpoint: format!("GET /localidades/estados/{region}/municipios"),
            })
    }
}
