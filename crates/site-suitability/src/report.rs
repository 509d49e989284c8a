//! Assessment results and map marker export

use crate::category::{MarkerColor, MarkerPalette};
use crate::hierarchy::CriterionWeights;
use crate::site_values::SiteValues;
use crate::{AhpModel, Coordinates, Result, StudyArea, Suitability};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

/// Score and category for one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub coordinates: Coordinates,
    pub site_values: SiteValues,
    /// Composite AHP score (0-1 for in-range site values)
    pub score: f64,
    pub suitability: Suitability,
}

impl Assessment {
    /// Marker popup line
    pub fn popup_text(&self) -> String {
        format!(
            "Lat: {:.4}, Lon: {:.4} | Score: {:.3} | {}",
            self.coordinates.latitude,
            self.coordinates.longitude,
            self.score,
            self.suitability.label()
        )
    }

    /// Score clamped to [0, 1] for progress bars
    pub fn progress(&self) -> f64 {
        self.score.clamp(0.0, 1.0)
    }

    pub fn marker_color(&self, palette: &MarkerPalette) -> MarkerColor {
        palette.color(self.suitability)
    }
}

/// Batch evaluation output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub assessments: Vec<Assessment>,
    pub metadata: EvaluationMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationMetadata {
    pub total_sites: usize,
    pub category_distribution: BTreeMap<String, usize>,
    /// Effective (normalized) criterion weights used for scoring
    pub criterion_weights: CriterionWeights,
    pub generated_at: String,
}

impl EvaluationResult {
    /// Rank assessments and attach run metadata
    pub fn new(mut assessments: Vec<Assessment>, model: &AhpModel) -> Self {
        rank(&mut assessments);

        let mut category_distribution: BTreeMap<String, usize> = BTreeMap::new();
        for a in &assessments {
            *category_distribution
                .entry(a.suitability.label().to_string())
                .or_default() += 1;
        }

        let metadata = EvaluationMetadata {
            total_sites: assessments.len(),
            category_distribution,
            criterion_weights: model.weights().criteria().normalized(),
            generated_at: chrono::Utc::now().to_rfc3339(),
        };

        info!("Evaluated {} sites", metadata.total_sites);

        Self {
            assessments,
            metadata,
        }
    }
}

/// Sort by score descending
pub fn rank(assessments: &mut [Assessment]) {
    assessments.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
}

/// Point feature for one assessment
pub fn to_feature(assessment: &Assessment, palette: &MarkerPalette) -> Feature {
    let geometry = Geometry::new(Value::Point(vec![
        assessment.coordinates.longitude,
        assessment.coordinates.latitude,
    ]));

    let mut properties = JsonObject::new();
    if let Some(id) = &assessment.id {
        properties.insert("id".to_string(), JsonValue::from(id.as_str()));
    }
    if let Some(name) = &assessment.name {
        properties.insert("name".to_string(), JsonValue::from(name.as_str()));
    }
    properties.insert("score".to_string(), JsonValue::from(assessment.score));
    properties.insert(
        "suitability".to_string(),
        JsonValue::from(assessment.suitability.label()),
    );
    properties.insert(
        "marker_color".to_string(),
        JsonValue::from(assessment.marker_color(palette).as_str()),
    );
    properties.insert("popup".to_string(), JsonValue::from(assessment.popup_text()));
    for (sub, value) in assessment.site_values.iter() {
        properties.insert(sub.name().to_string(), JsonValue::from(value));
    }

    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Feature collection framed to the study area, with run metadata attached
pub fn to_feature_collection(
    result: &EvaluationResult,
    palette: &MarkerPalette,
    area: &StudyArea,
) -> Result<FeatureCollection> {
    let features = result
        .assessments
        .iter()
        .map(|a| to_feature(a, palette))
        .collect();

    let mut foreign_members = JsonObject::new();
    foreign_members.insert("metadata".to_string(), serde_json::to_value(&result.metadata)?);

    Ok(FeatureCollection {
        bbox: Some(area.bbox()),
        features,
        foreign_members: Some(foreign_members),
    })
}
