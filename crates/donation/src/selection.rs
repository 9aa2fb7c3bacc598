//! UF -> municipality dependent selection.
//!
//! The selector never fetches anything itself. Choosing a region returns a
//! [`DivisionRequest`] that the caller runs in the background and feeds back
//! through [`DependentSelector::apply_divisions`].

use geography::{DivisionName, RegionCode};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::debug;

/// What to do with a division list that arrives after a newer region was
/// already selected.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StalePolicy {
    /// Only the response to the latest selection is applied.
    #[default]
    Discard,
    /// Every response is applied in arrival order.
    LastWriteWins,
}

/// A division fetch the caller has to execute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DivisionRequest {
    pub region: RegionCode,
    pub generation: u64,
}

#[derive(Debug, Clone, Default)]
pub struct DependentSelector {
    policy: StalePolicy,
    region: RegionCode,
    division: DivisionName,
    regions: Vec<RegionCode>,
    divisions: Vec<DivisionName>,
    /// Region the current `divisions` were fetched for.
    divisions_region: Option<RegionCode>,
    generation: u64,
}

impl DependentSelector {
    pub fn new(policy: StalePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> StalePolicy {
        self.policy
    }

    pub fn region(&self) -> &RegionCode {
        &self.region
    }

    pub fn division(&self) -> &DivisionName {
        &self.division
    }

    pub fn regions(&self) -> &[RegionCode] {
        &self.regions
    }

    pub fn divisions(&self) -> &[DivisionName] {
        &self.divisions
    }

    pub fn divisions_region(&self) -> Option<&RegionCode> {
        self.divisions_region.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn set_regions(&mut self, regions: Vec<RegionCode>) {
        debug!(count = regions.len(), "region options replaced");
        self.regions = regions;
    }

    /// Fetch for the currently selected region without bumping the
    /// generation. Used once at startup for the sentinel.
    pub fn initial_request(&self) -> DivisionRequest {
        DivisionRequest {
            region: self.region.clone(),
            generation: self.generation,
        }
    }

    /// Select `region`. The selected division is kept as is; the returned
    /// request repopulates the division options.
    pub fn select_region(&mut self, region: RegionCode) -> DivisionRequest {
        self.generation += 1;
        self.region = region;
        debug!(region = %self.region, generation = self.generation, "region selected");
        DivisionRequest {
            region: self.region.clone(),
            generation: self.generation,
        }
    }

    pub fn is_current(&self, request: &DivisionRequest) -> bool {
        request.generation == self.generation
    }

    /// Apply a completed fetch. Returns whether the division options changed.
    pub fn apply_divisions(
        &mut self,
        request: &DivisionRequest,
        divisions: Vec<DivisionName>,
    ) -> bool {
        if self.policy == StalePolicy::Discard && !self.is_current(request) {
            debug!(
                region = %request.region,
                generation = request.generation,
                latest = self.generation,
                "discarding stale division list"
            );
            return false;
        }
        self.divisions = divisions;
        self.divisions_region = Some(request.region.clone());
        true
    }

    pub fn select_division(&mut self, division: DivisionName) {
        self.division = division;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<DivisionName> {
        list.iter().copied().map(DivisionName::from).collect()
    }

    #[test]
    fn starts_at_the_sentinel() {
        let sel = DependentSelector::default();
        assert!(sel.region().is_none());
        assert!(sel.division().is_none());
        assert!(sel.divisions().is_empty());
        assert_eq!(sel.initial_request().region, RegionCode::none());
        assert_eq!(sel.initial_request().generation, 0);
    }

    #[test]
    fn selecting_a_region_bumps_generation_and_keeps_division() {
        let mut sel = DependentSelector::default();
        sel.select_division("Foz do Iguaçu".into());

        let req = sel.select_region("PR".into());
        assert_eq!(req.region.as_str(), "PR");
        assert_eq!(req.generation, 1);
        assert_eq!(sel.division().as_str(), "Foz do Iguaçu");

        assert!(sel.apply_divisions(&req, names(&["Foz do Iguaçu", "Curitiba"])));
        assert_eq!(sel.divisions(), names(&["Foz do Iguaçu", "Curitiba"]).as_slice());
        assert_eq!(sel.divisions_region().map(RegionCode::as_str), Some("PR"));
    }

    #[test]
    fn discard_ignores_out_of_order_responses() {
        let mut sel = DependentSelector::new(StalePolicy::Discard);
        let sp = sel.select_region("SP".into());
        let pr = sel.select_region("PR".into());

        assert!(sel.apply_divisions(&pr, names(&["Curitiba"])));
        assert!(!sel.apply_divisions(&sp, names(&["Campinas"])));
        assert_eq!(sel.divisions(), names(&["Curitiba"]).as_slice());
        assert_eq!(sel.region().as_str(), "PR");
    }

    #[test]
    fn last_write_wins_keeps_the_last_resolved_list() {
        let mut sel = DependentSelector::new(StalePolicy::LastWriteWins);
        let sp = sel.select_region("SP".into());
        let pr = sel.select_region("PR".into());

        assert!(sel.apply_divisions(&pr, names(&["Curitiba"])));
        assert!(sel.apply_divisions(&sp, names(&["Campinas"])));
        assert_eq!(sel.divisions(), names(&["Campinas"]).as_slice());
        assert_eq!(sel.divisions_region().map(RegionCode::as_str), Some("SP"));
        assert_eq!(sel.region().as_str(), "PR");
    }

    #[test]
    fn reselecting_the_same_region_issues_a_new_request() {
        let mut sel = DependentSelector::default();
        let first = sel.select_region("PR".into());
        let second = sel.select_region("PR".into());
        assert_ne!(first, second);
        assert!(!sel.is_current(&first));
        assert!(sel.is_current(&second));
    }

    #[test]
    fn policy_parses_from_config_strings() {
        assert_eq!(
            "last_write_wins".parse::<StalePolicy>().unwrap(),
            StalePolicy::LastWriteWins
        );
        assert_eq!(StalePolicy::Discard.to_string(), "discard");
    }
}
