//! Criteria hierarchy and weight tables
//!
//! Two levels: three top-level criteria, each owning a fixed set of
//! sub-criteria. A sub-criterion's global weight is always derived as
//! `criterion weight × local weight` and is recomputed whenever a criterion
//! weight changes.

use crate::{Result, SuitabilityError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Default top-level weights (pre-computed AHP priorities)
pub const W_TECHNICAL: f64 = 0.693;
pub const W_ENVIRONMENTAL: f64 = 0.187;
pub const W_SOCIAL: f64 = 0.080;

/// Allowed deviation from 1.0 for a criterion's local weight sum
pub const LOCAL_WEIGHT_TOLERANCE: f64 = 1e-6;

/// Top-level evaluation criteria
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Criterion {
    Technical,
    Environmental,
    Social,
}

impl Criterion {
    /// Evaluation order
    pub const ALL: [Criterion; 3] = [Self::Technical, Self::Environmental, Self::Social];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Technical => "Technical",
            Self::Environmental => "Environmental",
            Self::Social => "Social",
        }
    }

    /// Sub-criteria owned by this criterion, in evaluation order
    pub fn sub_criteria(&self) -> &'static [SubCriterion] {
        use SubCriterion::*;
        match self {
            Self::Technical => &[SolarRadiation, Slope, ProximityToGrid, LandCost],
            Self::Environmental => &[LandUse, DistanceFromProtectedAreas, WaterBodyBuffer],
            Self::Social => &[DistanceFromRoads, ProximityToDemandCenters, PopulationDensity],
        }
    }
}

/// Second-level evaluation factors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SubCriterion {
    #[serde(rename = "Solar Radiation")]
    SolarRadiation,
    #[serde(rename = "Slope")]
    Slope,
    #[serde(rename = "Proximity to Grid")]
    ProximityToGrid,
    #[serde(rename = "Land Cost")]
    LandCost,
    #[serde(rename = "Land Use")]
    LandUse,
    #[serde(rename = "Distance from Protected Areas")]
    DistanceFromProtectedAreas,
    #[serde(rename = "Water Body Buffer")]
    WaterBodyBuffer,
    #[serde(rename = "Distance from Roads")]
    DistanceFromRoads,
    #[serde(rename = "Proximity to Demand Centers")]
    ProximityToDemandCenters,
    #[serde(rename = "Population Density")]
    PopulationDensity,
}

impl SubCriterion {
    pub const ALL: [SubCriterion; 10] = [
        Self::SolarRadiation,
        Self::Slope,
        Self::ProximityToGrid,
        Self::LandCost,
        Self::LandUse,
        Self::DistanceFromProtectedAreas,
        Self::WaterBodyBuffer,
        Self::DistanceFromRoads,
        Self::ProximityToDemandCenters,
        Self::PopulationDensity,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::SolarRadiation => "Solar Radiation",
            Self::Slope => "Slope",
            Self::ProximityToGrid => "Proximity to Grid",
            Self::LandCost => "Land Cost",
            Self::LandUse => "Land Use",
            Self::DistanceFromProtectedAreas => "Distance from Protected Areas",
            Self::WaterBodyBuffer => "Water Body Buffer",
            Self::DistanceFromRoads => "Distance from Roads",
            Self::ProximityToDemandCenters => "Proximity to Demand Centers",
            Self::PopulationDensity => "Population Density",
        }
    }

    /// Look up a sub-criterion by its display name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    pub fn parent(&self) -> Criterion {
        match self {
            Self::SolarRadiation | Self::Slope | Self::ProximityToGrid | Self::LandCost => {
                Criterion::Technical
            }
            Self::LandUse | Self::DistanceFromProtectedAreas | Self::WaterBodyBuffer => {
                Criterion::Environmental
            }
            Self::DistanceFromRoads | Self::ProximityToDemandCenters | Self::PopulationDensity => {
                Criterion::Social
            }
        }
    }

    /// Default local weight (relative to siblings under the same parent)
    pub fn default_local_weight(&self) -> f64 {
        match self {
            Self::SolarRadiation => 0.558,
            Self::Slope => 0.262,
            Self::ProximityToGrid => 0.130,
            Self::LandCost => 0.050,
            Self::LandUse => 0.258,
            Self::DistanceFromProtectedAreas => 0.637,
            Self::WaterBodyBuffer => 0.105,
            Self::DistanceFromRoads => 0.637,
            Self::ProximityToDemandCenters => 0.258,
            Self::PopulationDensity => 0.105,
        }
    }
}

/// Top-level criterion weights
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriterionWeights {
    /// Weight for Technical (default: 0.693)
    pub technical: f64,
    /// Weight for Environmental (default: 0.187)
    pub environmental: f64,
    /// Weight for Social (default: 0.080)
    pub social: f64,
}

impl Default for CriterionWeights {
    fn default() -> Self {
        Self {
            technical: W_TECHNICAL,
            environmental: W_ENVIRONMENTAL,
            social: W_SOCIAL,
        }
    }
}

impl CriterionWeights {
    pub fn get(&self, criterion: Criterion) -> f64 {
        match criterion {
            Criterion::Technical => self.technical,
            Criterion::Environmental => self.environmental,
            Criterion::Social => self.social,
        }
    }

    pub fn set(&mut self, criterion: Criterion, value: f64) {
        match criterion {
            Criterion::Technical => self.technical = value,
            Criterion::Environmental => self.environmental = value,
            Criterion::Social => self.social = value,
        }
    }

    pub fn sum(&self) -> f64 {
        self.technical + self.environmental + self.social
    }

    /// Scale weights to sum to 1.0. A zero sum divides by 1.0 instead,
    /// leaving all-zero weights untouched.
    pub fn normalized(&self) -> Self {
        let total = self.sum();
        let divisor = if total == 0.0 { 1.0 } else { total };
        Self {
            technical: self.technical / divisor,
            environmental: self.environmental / divisor,
            social: self.social / divisor,
        }
    }
}

/// Local weights keyed by sub-criterion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalWeights(BTreeMap<SubCriterion, f64>);

impl Default for LocalWeights {
    fn default() -> Self {
        Self(
            SubCriterion::ALL
                .into_iter()
                .map(|s| (s, s.default_local_weight()))
                .collect(),
        )
    }
}

impl LocalWeights {
    pub fn get(&self, sub: SubCriterion) -> Option<f64> {
        self.0.get(&sub).copied()
    }

    pub fn set(&mut self, sub: SubCriterion, value: f64) {
        self.0.insert(sub, value);
    }

    /// Sum of the local weights under one criterion (missing entries count as 0)
    pub fn sum_for(&self, criterion: Criterion) -> f64 {
        criterion
            .sub_criteria()
            .iter()
            .map(|s| self.get(*s).unwrap_or(0.0))
            .sum()
    }
}

impl FromIterator<(SubCriterion, f64)> for LocalWeights {
    fn from_iter<I: IntoIterator<Item = (SubCriterion, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Weight configuration as loaded from disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightConfig {
    #[serde(default)]
    pub criteria: CriterionWeights,
    #[serde(default)]
    pub local: LocalWeights,
}

impl WeightConfig {
    /// Reject configurations that would produce meaningless scores
    pub fn validate(&self) -> Result<()> {
        for criterion in Criterion::ALL {
            check_weight(criterion.name(), self.criteria.get(criterion))?;
        }
        if self.criteria.sum() == 0.0 {
            return Err(SuitabilityError::ZeroCriterionWeights);
        }

        for criterion in Criterion::ALL {
            for sub in criterion.sub_criteria() {
                let w = self
                    .local
                    .get(*sub)
                    .ok_or(SuitabilityError::MissingLocalWeight(*sub))?;
                check_weight(sub.name(), w)?;
            }

            let sum = self.local.sum_for(criterion);
            if (sum - 1.0).abs() > LOCAL_WEIGHT_TOLERANCE {
                return Err(SuitabilityError::LocalWeightSum { criterion, sum });
            }
        }

        Ok(())
    }

    /// Validate and build a hierarchy with criterion weights normalized to 1.0
    pub fn into_hierarchy(self) -> Result<WeightHierarchy> {
        self.validate()?;
        Ok(WeightHierarchy::new(self.criteria.normalized(), self.local))
    }
}

fn check_weight(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SuitabilityError::InvalidWeight {
            name: name.to_string(),
            value,
        })
    }
}

/// Criterion weights, local weights and the derived global weights
#[derive(Debug, Clone, PartialEq)]
pub struct WeightHierarchy {
    criteria: CriterionWeights,
    local: LocalWeights,
    global: BTreeMap<SubCriterion, f64>,
}

impl Default for WeightHierarchy {
    fn default() -> Self {
        Self::new(CriterionWeights::default(), LocalWeights::default())
    }
}

impl WeightHierarchy {
    /// Build without validation. Use [`WeightConfig::into_hierarchy`] for
    /// untrusted input.
    pub fn new(criteria: CriterionWeights, local: LocalWeights) -> Self {
        let mut hierarchy = Self {
            criteria,
            local,
            global: BTreeMap::new(),
        };
        hierarchy.recompute_global();
        hierarchy
    }

    pub fn criteria(&self) -> CriterionWeights {
        self.criteria
    }

    pub fn criterion_weight(&self, criterion: Criterion) -> f64 {
        self.criteria.get(criterion)
    }

    pub fn local_weight(&self, sub: SubCriterion) -> f64 {
        self.local.get(sub).unwrap_or(0.0)
    }

    /// Global weight; sub-criteria without a local weight contribute nothing
    pub fn global_weight(&self, sub: SubCriterion) -> f64 {
        self.global.get(&sub).copied().unwrap_or(0.0)
    }

    /// Sum of all global weights (the score of a site with every value at 1.0)
    pub fn global_sum(&self) -> f64 {
        Criterion::ALL
            .iter()
            .flat_map(|c| c.sub_criteria())
            .map(|s| self.global_weight(*s))
            .sum()
    }

    /// Overwrite one criterion weight and recompute all global weights.
    /// The other criteria are left as they are.
    pub fn set_criterion_weight(&mut self, criterion: Criterion, value: f64) {
        self.criteria.set(criterion, value);
        self.recompute_global();
    }

    fn recompute_global(&mut self) {
        self.global.clear();
        for criterion in Criterion::ALL {
            let parent = self.criteria.get(criterion);
            for sub in criterion.sub_criteria() {
                if let Some(local) = self.local.get(*sub) {
                    self.global.insert(*sub, parent * local);
                }
            }
        }
        debug!(
            "Recomputed global weights (T={:.3}, E={:.3}, S={:.3}, sum={:.3})",
            self.criteria.technical,
            self.criteria.environmental,
            self.criteria.social,
            self.global_sum()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_sub_criterion_has_one_parent() {
        for sub in SubCriterion::ALL {
            let owners: Vec<_> = Criterion::ALL
                .iter()
                .filter(|c| c.sub_criteria().contains(&sub))
                .collect();
            assert_eq!(owners.len(), 1, "{:?} owned by {:?}", sub, owners);
            assert_eq!(*owners[0], sub.parent());
        }
    }

    #[test]
    fn test_default_local_weights_sum_to_one() {
        let local = LocalWeights::default();
        for criterion in Criterion::ALL {
            let sum = local.sum_for(criterion);
            assert!((sum - 1.0).abs() < 1e-9, "{:?} local sum: {}", criterion, sum);
        }
    }

    #[test]
    fn test_sub_criterion_names_round_trip() {
        for sub in SubCriterion::ALL {
            assert_eq!(SubCriterion::from_name(sub.name()), Some(sub));
        }
        assert_eq!(SubCriterion::from_name("Elevation"), None);
    }

    #[test]
    fn test_serde_uses_display_names() {
        let json = serde_json::to_string(&SubCriterion::DistanceFromProtectedAreas).unwrap();
        assert_eq!(json, "\"Distance from Protected Areas\"");
    }

    #[test]
    fn test_normalized_zero_sum_uses_unit_divisor() {
        let zero = CriterionWeights {
            technical: 0.0,
            environmental: 0.0,
            social: 0.0,
        };
        assert_eq!(zero.normalized(), zero);

        let raw = CriterionWeights {
            technical: 2.0,
            environmental: 1.0,
            social: 1.0,
        };
        let n = raw.normalized();
        assert!((n.technical - 0.5).abs() < 1e-12);
        assert!((n.environmental - 0.25).abs() < 1e-12);
        assert!((n.sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_global_weight_is_product() {
        let h = WeightHierarchy::default();
        for sub in SubCriterion::ALL {
            let expected = h.criterion_weight(sub.parent()) * h.local_weight(sub);
            assert!((h.global_weight(sub) - expected).abs() < 1e-12);
        }
        // Raw defaults sum to 0.960
        assert!((h.global_sum() - 0.960).abs() < 1e-9);
    }

    #[test]
    fn test_set_criterion_weight_recomputes_globals() {
        let mut h = WeightHierarchy::default();
        h.set_criterion_weight(Criterion::Social, 0.5);

        assert!((h.global_weight(SubCriterion::DistanceFromRoads) - 0.5 * 0.637).abs() < 1e-12);
        // Other criteria are not re-normalized
        assert_eq!(h.criterion_weight(Criterion::Technical), W_TECHNICAL);
        assert_eq!(h.criterion_weight(Criterion::Environmental), W_ENVIRONMENTAL);
    }

    #[test]
    fn test_config_normalizes_criteria() {
        let h = WeightConfig::default().into_hierarchy().unwrap();
        assert!((h.criteria().sum() - 1.0).abs() < 1e-12);
        assert!((h.global_sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_config_rejects_negative_weight() {
        let mut config = WeightConfig::default();
        config.criteria.environmental = -0.1;
        assert!(matches!(
            config.validate(),
            Err(SuitabilityError::InvalidWeight { .. })
        ));

        let mut config = WeightConfig::default();
        config.local.set(SubCriterion::Slope, f64::NAN);
        assert!(matches!(
            config.validate(),
            Err(SuitabilityError::InvalidWeight { .. })
        ));
    }

    #[test]
    fn test_config_rejects_zero_criteria() {
        let config = WeightConfig {
            criteria: CriterionWeights {
                technical: 0.0,
                environmental: 0.0,
                social: 0.0,
            },
            local: LocalWeights::default(),
        };
        assert!(matches!(
            config.validate(),
            Err(SuitabilityError::ZeroCriterionWeights)
        ));
    }

    #[test]
    fn test_config_rejects_bad_local_sum() {
        let mut config = WeightConfig::default();
        config.local.set(SubCriterion::LandCost, 0.2);
        match config.validate() {
            Err(SuitabilityError::LocalWeightSum { criterion, sum }) => {
                assert_eq!(criterion, Criterion::Technical);
                assert!((sum - 1.15).abs() < 1e-9);
            }
            other => panic!("expected LocalWeightSum, got {:?}", other),
        }
    }

    #[test]
    fn test_config_rejects_missing_local() {
        let local: LocalWeights = SubCriterion::ALL
            .into_iter()
            .filter(|s| *s != SubCriterion::WaterBodyBuffer)
            .map(|s| (s, s.default_local_weight()))
            .collect();
        let config = WeightConfig {
            criteria: CriterionWeights::default(),
            local,
        };
        assert!(matches!(
            config.validate(),
            Err(SuitabilityError::MissingLocalWeight(SubCriterion::WaterBodyBuffer))
        ));
    }
}
