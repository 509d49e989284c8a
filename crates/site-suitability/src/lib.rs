//! Site Suitability (AHP)
//!
//! Scores a geographic point for solar site suitability with a fixed-weight
//! Analytic Hierarchy Process, classifies the score and renders it as a map
//! marker.
//!
//! # Scoring Model (3 criteria, 10 sub-criteria)
//!
//! ```text
//! Score(site) = Σ v_ij · (W_i · w_ij) / Σ (W_i · w_ij)
//! ```
//!
//! | Criterion     | W     | Sub-criteria (local weight w) |
//! |---------------|-------|-------------------------------|
//! | Technical     | 0.693 | Solar Radiation 0.558, Slope 0.262, Proximity to Grid 0.130, Land Cost 0.050 |
//! | Environmental | 0.187 | Land Use 0.258, Distance from Protected Areas 0.637, Water Body Buffer 0.105 |
//! | Social        | 0.080 | Distance from Roads 0.637, Proximity to Demand Centers 0.258, Population Density 0.105 |
//!
//! # Suitability Bands
//!
//! | Score    | Category            |
//! |----------|---------------------|
//! | ≥ 0.8    | Highly Suitable     |
//! | ≥ 0.6    | Moderately Suitable |
//! | ≥ 0.4    | Marginally Suitable |
//! | < 0.4    | Not Suitable        |

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod category;
pub mod hierarchy;
pub mod loader;
pub mod model;
pub mod report;
pub mod site_values;

pub use category::{MarkerColor, MarkerPalette, Suitability};
pub use hierarchy::{Criterion, CriterionWeights, LocalWeights, SubCriterion, WeightConfig, WeightHierarchy};
pub use model::AhpModel;
pub use report::{Assessment, EvaluationResult};
pub use site_values::{SiteValueSource, SiteValues, SyntheticSource};

/// Default query location (Indore, Madhya Pradesh)
pub const DEFAULT_LATITUDE: f64 = 22.7196;
pub const DEFAULT_LONGITUDE: f64 = 75.8577;

#[derive(Error, Debug)]
pub enum SuitabilityError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid weight for {name}: {value} (must be finite and non-negative)")]
    InvalidWeight { name: String, value: f64 },
    #[error("Criterion weights sum to zero")]
    ZeroCriterionWeights,
    #[error("Missing local weight for {0:?}")]
    MissingLocalWeight(SubCriterion),
    #[error("Local weights under {criterion:?} sum to {sum}, expected 1.0")]
    LocalWeightSum { criterion: Criterion, sum: f64 },
    #[error("Invalid coordinate: lat={0}, lon={1}")]
    InvalidCoordinate(f64, f64),
    #[error("No sites found")]
    NoSites,
}

pub type Result<T> = std::result::Result<T, SuitabilityError>;

/// A validated WGS84 point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if is_valid_latitude(latitude) && is_valid_longitude(longitude) {
            Ok(Self { latitude, longitude })
        } else {
            Err(SuitabilityError::InvalidCoordinate(latitude, longitude))
        }
    }
}

impl Default for Coordinates {
    fn default() -> Self {
        Self {
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
        }
    }
}

/// Validate latitude is in valid range
pub fn is_valid_latitude(lat: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && lat.is_finite()
}

/// Validate longitude is in valid range
pub fn is_valid_longitude(lon: f64) -> bool {
    (-180.0..=180.0).contains(&lon) && lon.is_finite()
}

/// Rectangular region the model is calibrated for
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StudyArea {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl StudyArea {
    /// Mainland India
    pub const INDIA: StudyArea = StudyArea {
        min_latitude: 6.0,
        max_latitude: 37.0,
        min_longitude: 68.0,
        max_longitude: 97.0,
    };

    pub fn contains(&self, coords: Coordinates) -> bool {
        (self.min_latitude..=self.max_latitude).contains(&coords.latitude)
            && (self.min_longitude..=self.max_longitude).contains(&coords.longitude)
    }

    /// GeoJSON bbox ordering: [west, south, east, north]
    pub fn bbox(&self) -> Vec<f64> {
        vec![
            self.min_longitude,
            self.min_latitude,
            self.max_longitude,
            self.max_latitude,
        ]
    }
}

impl Default for StudyArea {
    fn default() -> Self {
        Self::INDIA
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_validation() {
        assert!(Coordinates::new(22.7196, 75.8577).is_ok());
        assert!(Coordinates::new(-90.0, 180.0).is_ok());
        assert!(Coordinates::new(90.5, 75.0).is_err());
        assert!(Coordinates::new(22.0, -180.1).is_err());
        assert!(Coordinates::new(f64::NAN, 75.0).is_err());
        assert!(Coordinates::new(22.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_study_area_contains() {
        let area = StudyArea::INDIA;
        assert!(area.contains(Coordinates::default()));
        assert!(area.contains(Coordinates { latitude: 6.0, longitude: 97.0 }));
        // London
        assert!(!area.contains(Coordinates { latitude: 51.5074, longitude: -0.1278 }));
        assert_eq!(area.bbox(), vec![68.0, 6.0, 97.0, 37.0]);
    }
}
