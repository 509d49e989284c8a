//! Site value sets and the sources that produce them

use crate::hierarchy::SubCriterion;
use crate::Coordinates;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Normalized observations for one location, keyed by sub-criterion.
/// Missing entries read as 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteValues(BTreeMap<SubCriterion, f64>);

impl SiteValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every sub-criterion set to the same value
    pub fn uniform(value: f64) -> Self {
        SubCriterion::ALL.into_iter().map(|s| (s, value)).collect()
    }

    /// Build from display-name pairs. Names that match no sub-criterion are
    /// skipped.
    pub fn from_named<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut values = Self::new();
        for (name, value) in pairs {
            match SubCriterion::from_name(name) {
                Some(sub) => values.set(sub, value),
                None => warn!("Ignoring unknown sub-criterion {:?}", name),
            }
        }
        values
    }

    pub fn get(&self, sub: SubCriterion) -> f64 {
        self.0.get(&sub).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, sub: SubCriterion, value: f64) {
        self.0.insert(sub, value);
    }

    pub fn with(mut self, sub: SubCriterion, value: f64) -> Self {
        self.set(sub, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (SubCriterion, f64)> + '_ {
        self.0.iter().map(|(s, v)| (*s, *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(SubCriterion, f64)> for SiteValues {
    fn from_iter<I: IntoIterator<Item = (SubCriterion, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Anything that can supply site values for a location.
///
/// A real implementation would sample satellite irradiance, terrain, OSM
/// feature distances and land-cost data; values must land in [0, 1].
pub trait SiteValueSource {
    fn site_values(&self, coords: Coordinates) -> SiteValues;
}

impl<F> SiteValueSource for F
where
    F: Fn(Coordinates) -> SiteValues,
{
    fn site_values(&self, coords: Coordinates) -> SiteValues {
        self(coords)
    }
}

impl SiteValueSource for SiteValues {
    fn site_values(&self, _coords: Coordinates) -> SiteValues {
        self.clone()
    }
}

/// Placeholder generator: smooth trigonometric surfaces over lat/lon,
/// tuned so central India scores well. Not derived from real data.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticSource;

impl SiteValueSource for SyntheticSource {
    fn site_values(&self, coords: Coordinates) -> SiteValues {
        let lat = coords.latitude;
        let lon = coords.longitude;

        let raw = [
            (SubCriterion::SolarRadiation, 0.5 + 0.5 * (lat / 10.0).sin()),
            (SubCriterion::Slope, 1.0 - (lat - 22.0).abs() / 30.0),
            (SubCriterion::ProximityToGrid, 1.0 - (lon - 75.0).abs() / 20.0),
            (SubCriterion::LandCost, 0.5 + 0.5 * (lon / 10.0).cos()),
            (SubCriterion::LandUse, 0.6 + 0.4 * (lat * lon / 1000.0).sin()),
            (SubCriterion::DistanceFromProtectedAreas, 0.7 - 0.7 * (lat / 15.0).sin()),
            (SubCriterion::WaterBodyBuffer, 0.5 + 0.5 * (lat / 12.0).cos()),
            (SubCriterion::DistanceFromRoads, 1.0 - (lat - 23.0).abs() / 20.0),
            (SubCriterion::ProximityToDemandCenters, 0.5 + 0.5 * (lon / 10.0).sin()),
            (SubCriterion::PopulationDensity, 0.6 + 0.4 * (lat * lon / 500.0).cos()),
        ];

        raw.into_iter().map(|(s, v)| (s, v.clamp(0.0, 1.0))).collect()
    }
}
