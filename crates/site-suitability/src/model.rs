//! AHP scoring model
//!
//! Implements the hierarchical weighted sum:
//! Score(site) = Σ_i Σ_j v_ij · g_ij / Σ_i Σ_j g_ij, with g_ij = W_i · w_ij
//!
//! The divisor is 1.0 for a well-formed hierarchy. It is kept so that a
//! hierarchy whose criterion weights no longer sum to 1 still yields a score
//! on the same scale.

use crate::hierarchy::{Criterion, CriterionWeights, WeightConfig, WeightHierarchy};
use crate::report::Assessment;
use crate::site_values::{SiteValueSource, SiteValues};
use crate::{Coordinates, Result, Suitability};
use tracing::debug;

/// Fixed-weight AHP model
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AhpModel {
    weights: WeightHierarchy,
}

impl AhpModel {
    /// Model with the published default weights
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hierarchy(weights: WeightHierarchy) -> Self {
        Self { weights }
    }

    /// Validate a configuration and build a model from it
    pub fn from_config(config: WeightConfig) -> Result<Self> {
        Ok(Self::with_hierarchy(config.into_hierarchy()?))
    }

    pub fn weights(&self) -> &WeightHierarchy {
        &self.weights
    }

    /// Overwrite a single criterion weight.
    ///
    /// The value is stored as given: the other two criteria are not
    /// re-normalized. Callers adjusting all three should use
    /// [`AhpModel::set_criterion_weights`].
    pub fn set_criterion_weight(&mut self, criterion: Criterion, value: f64) {
        self.weights.set_criterion_weight(criterion, value);
    }

    /// Normalize raw criterion weights by their sum (1.0 when the sum is
    /// zero) and apply them.
    pub fn set_criterion_weights(&mut self, raw: CriterionWeights) {
        let normalized = raw.normalized();
        for criterion in Criterion::ALL {
            self.set_criterion_weight(criterion, normalized.get(criterion));
        }
    }

    /// Weighted score of a site. Absent sub-criteria count as 0; the result
    /// is not clamped.
    pub fn score(&self, site_values: &SiteValues) -> f64 {
        let mut total = 0.0;
        let mut max_sum = 0.0;

        for criterion in Criterion::ALL {
            for sub in criterion.sub_criteria() {
                let global = self.weights.global_weight(*sub);
                total += site_values.get(*sub) * global;
                max_sum += global;
            }
        }

        if max_sum == 0.0 {
            0.0
        } else {
            total / max_sum
        }
    }

    /// Contribution of each criterion to the score
    pub fn criterion_scores(&self, site_values: &SiteValues) -> Vec<(Criterion, f64)> {
        let max_sum = self.weights.global_sum();
        Criterion::ALL
            .iter()
            .map(|criterion| {
                let part: f64 = criterion
                    .sub_criteria()
                    .iter()
                    .map(|s| site_values.get(*s) * self.weights.global_weight(*s))
                    .sum();
                let share = if max_sum == 0.0 { 0.0 } else { part / max_sum };
                (*criterion, share)
            })
            .collect()
    }

    pub fn classify(&self, score: f64) -> Suitability {
        Suitability::from_score(score)
    }

    /// Fetch site values for a location, score and classify them
    pub fn evaluate(&self, coords: Coordinates, source: &dyn SiteValueSource) -> Assessment {
        let site_values = source.site_values(coords);
        self.assess(coords, site_values)
    }

    /// Score and classify values that are already in hand
    pub fn assess(&self, coords: Coordinates, site_values: SiteValues) -> Assessment {
        let score = self.score(&site_values);
        let suitability = self.classify(score);

        debug!(
            "Assessed ({:.4}, {:.4}): {:.3} {}",
            coords.latitude, coords.longitude, score, suitability
        );

        Assessment {
            id: None,
            name: None,
            coordinates: coords,
            site_values,
            score,
            suitability,
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::hierarchy::{LocalWeights, SubCriterion};
    use proptest::prelude::*;

    fn unit_values() -> impl Strategy<Value = SiteValues> {
        prop::collection::vec(0.0f64..=1.0, 10)
            .prop_map(|v| SubCriterion::ALL.into_iter().zip(v).collect::<SiteValues>())
    }

    /// Random well-formed hierarchy: criteria sum to 1, each local set sums to 1
    fn well_formed() -> impl Strategy<Value = WeightHierarchy> {
        (
            prop::collection::vec(0.01f64..1.0, 3),
            prop::collection::vec(0.01f64..1.0, 10),
        )
            .prop_map(|(c, l)| {
                let criteria = CriterionWeights {
                    technical: c[0],
                    environmental: c[1],
                    social: c[2],
                }
                .normalized();

                let raw: Vec<(SubCriterion, f64)> = SubCriterion::ALL.into_iter().zip(l).collect();
                let local: LocalWeights = raw
                    .iter()
                    .map(|(s, w)| {
                        let siblings: f64 = raw
                            .iter()
                            .filter(|(o, _)| o.parent() == s.parent())
                            .map(|(_, w)| w)
                            .sum();
                        (*s, w / siblings)
                    })
                    .collect();

                WeightHierarchy::new(criteria, local)
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(2000))]

        // Fuzz: score stays in [0,1] for well-formed inputs
        #[test]
        fn fuzz_score_bounded(weights in well_formed(), values in unit_values()) {
            let model = AhpModel::with_hierarchy(weights);
            let score = model.score(&values);
            prop_assert!((-1e-9..=1.0 + 1e-9).contains(&score), "score out of range: {}", score);
        }

        // Fuzz: scaling one value scales only its own contribution
        #[test]
        fn fuzz_score_linear_per_value(
            values in unit_values(),
            idx in 0usize..10,
            k in 0.0f64..4.0,
        ) {
            let model = AhpModel::with_hierarchy(WeightConfig::default().into_hierarchy().unwrap());
            let sub = SubCriterion::ALL[idx];
            let v = values.get(sub);

            let base = model.score(&values);
            let scaled = model.score(&values.clone().with(sub, v * k));
            let g = model.weights().global_weight(sub) / model.weights().global_sum();

            prop_assert!(((scaled - base) - (k - 1.0) * v * g).abs() < 1e-9,
                "base={} scaled={} v={} k={} g={}", base, scaled, v, k, g);
        }

        // Fuzz: scoring is a pure function of its inputs
        #[test]
        fn fuzz_score_idempotent(weights in well_formed(), values in unit_values()) {
            let model = AhpModel::with_hierarchy(weights);
            prop_assert_eq!(model.score(&values).to_bits(), model.score(&values).to_bits());
        }

        // Fuzz: any finite input produces a finite score
        #[test]
        fn fuzz_score_finite(values in prop::collection::vec(-1e6f64..1e6, 10)) {
            let values: SiteValues = SubCriterion::ALL.into_iter().zip(values).collect();
            prop_assert!(AhpModel::new().score(&values).is_finite());
        }
    }
}
