//! Score bands and their display colors
//!
//! Labels and colors both hang off [`Suitability`], so the color mapping can
//! never disagree with the classification at a band boundary.

use serde::{Deserialize, Serialize};

/// Lower bound (inclusive) of each band
pub const HIGHLY_SUITABLE_MIN: f64 = 0.8;
pub const MODERATELY_SUITABLE_MIN: f64 = 0.6;
pub const MARGINALLY_SUITABLE_MIN: f64 = 0.4;

/// Site values below this are flagged red in per-criterion listings
pub const INDICATOR_THRESHOLD: f64 = 0.5;

/// Suitability category for a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suitability {
    #[serde(rename = "Highly Suitable")]
    HighlySuitable,
    #[serde(rename = "Moderately Suitable")]
    ModeratelySuitable,
    #[serde(rename = "Marginally Suitable")]
    MarginallySuitable,
    #[serde(rename = "Not Suitable")]
    NotSuitable,
}

impl Suitability {
    /// Threshold ladder, top-down, first match wins. NaN lands in `NotSuitable`.
    pub fn from_score(score: f64) -> Self {
        if score >= HIGHLY_SUITABLE_MIN {
            Self::HighlySuitable
        } else if score >= MODERATELY_SUITABLE_MIN {
            Self::ModeratelySuitable
        } else if score >= MARGINALLY_SUITABLE_MIN {
            Self::MarginallySuitable
        } else {
            Self::NotSuitable
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::HighlySuitable => "Highly Suitable",
            Self::ModeratelySuitable => "Moderately Suitable",
            Self::MarginallySuitable => "Marginally Suitable",
            Self::NotSuitable => "Not Suitable",
        }
    }
}

impl std::fmt::Display for Suitability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Marker colors understood by the map front-end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    Green,
    Yellow,
    Black,
    Orange,
    Red,
}

impl MarkerColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Black => "black",
            Self::Orange => "orange",
            Self::Red => "red",
        }
    }

    /// Indicator for a single site value: red below 0.5, green otherwise
    pub fn for_site_value(value: f64) -> Self {
        if value < INDICATOR_THRESHOLD {
            Self::Red
        } else {
            Self::Green
        }
    }
}

/// Band → color mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerPalette {
    pub highly: MarkerColor,
    pub moderately: MarkerColor,
    pub marginally: MarkerColor,
    pub not_suitable: MarkerColor,
}

impl MarkerPalette {
    /// green / yellow / orange / red
    pub const CLASSIC: MarkerPalette = MarkerPalette {
        highly: MarkerColor::Green,
        moderately: MarkerColor::Yellow,
        marginally: MarkerColor::Orange,
        not_suitable: MarkerColor::Red,
    };

    /// Black middle band, readable on light tile layers
    pub const CONTRAST: MarkerPalette = MarkerPalette {
        moderately: MarkerColor::Black,
        ..Self::CLASSIC
    };

    pub fn color(&self, suitability: Suitability) -> MarkerColor {
        match suitability {
            Suitability::HighlySuitable => self.highly,
            Suitability::ModeratelySuitable => self.moderately,
            Suitability::MarginallySuitable => self.marginally,
            Suitability::NotSuitable => self.not_suitable,
        }
    }

    pub fn color_for_score(&self, score: f64) -> MarkerColor {
        self.color(Suitability::from_score(score))
    }
}

impl Default for MarkerPalette {
    fn default() -> Self {
        Self::CLASSIC
    }
}
