//! Data loading from JSON files

use crate::site_values::SiteValues;
use crate::{is_valid_latitude, is_valid_longitude, Coordinates, Result, SuitabilityError, WeightConfig};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{info, warn};

/// Sanitize ID (alphanumeric, dash, underscore only)
fn sanitize_id(id: String) -> String {
    id.chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .take(128) // Max length
        .collect()
}

/// Sanitize name (allow more chars but still limit)
fn sanitize_name(name: String) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || " -_.,()&'".contains(*c))
        .take(256)
        .collect()
}

/// Raw candidate site from JSON
#[derive(Debug, Deserialize)]
struct RawSite {
    id: Option<String>,
    name: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    /// Measured values by sub-criterion name; overrides the value source
    values: Option<BTreeMap<String, f64>>,
}

/// A location to assess
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    pub id: String,
    pub name: String,
    pub coordinates: Coordinates,
    pub values: Option<SiteValues>,
}

/// Load and validate a weight configuration
pub fn load_weight_config(path: impl AsRef<Path>) -> Result<WeightConfig> {
    let path = path.as_ref();
    info!("Loading weight configuration from {:?}", path);

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let config: WeightConfig = serde_json::from_reader(reader)?;
    config.validate()?;

    info!(
        "Criterion weights: T={:.3}, E={:.3}, S={:.3}",
        config.criteria.technical, config.criteria.environmental, config.criteria.social
    );

    Ok(config)
}

/// Load candidate sites from a JSON array
pub fn load_sites(path: impl AsRef<Path>) -> Result<Vec<Site>> {
    let path = path.as_ref();
    info!("Loading sites from {:?}", path);

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let raw: Vec<RawSite> = serde_json::from_reader(reader)?;

    let mut sites = Vec::new();
    let mut skipped = 0;

    for (i, site) in raw.into_iter().enumerate() {
        let coordinates = match (site.latitude, site.longitude) {
            (Some(lat), Some(lon)) if is_valid_latitude(lat) && is_valid_longitude(lon) => {
                Coordinates { latitude: lat, longitude: lon }
            }
            (lat, lon) => {
                warn!("Skipping site #{}: bad coordinates ({:?}, {:?})", i, lat, lon);
                skipped += 1;
                continue;
            }
        };

        let id = sanitize_id(site.id.unwrap_or_else(|| format!("site-{}", i)));
        let name = sanitize_name(site.name.unwrap_or_else(|| "Unknown".to_string()));
        let values = site
            .values
            .map(|v| SiteValues::from_named(v.iter().map(|(k, v)| (k.as_str(), *v))));

        sites.push(Site {
            id,
            name,
            coordinates,
            values,
        });
    }

    info!(
        "Loaded {} sites ({} skipped for missing or invalid coords)",
        sites.len(),
        skipped
    );

    if sites.is_empty() {
        return Err(SuitabilityError::NoSites);
    }

    Ok(sites)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::SubCriterion;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_sites() {
        let file = write_temp(
            r#"[
            {"id": "jodhpur-1", "name": "Jodhpur <East>", "latitude": 26.2389, "longitude": 73.0243},
            {"id": "no-coords", "name": "No Coords"},
            {"id": "bad-lat", "latitude": 123.0, "longitude": 75.0},
            {"latitude": 23.0, "longitude": 77.0, "values": {"Solar Radiation": 0.9, "Elevation": 0.1}}
        ]"#,
        );

        let sites = load_sites(file.path()).unwrap();
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].id, "jodhpur-1");
        assert_eq!(sites[0].name, "Jodhpur East");
        assert!(sites[0].values.is_none());

        assert_eq!(sites[1].id, "site-3");
        let values = sites[1].values.as_ref().unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values.get(SubCriterion::SolarRadiation), 0.9);
    }

    #[test]
    fn test_load_sites_empty() {
        let file = write_temp(r#"[{"name": "Nowhere"}]"#);
        assert!(matches!(load_sites(file.path()), Err(SuitabilityError::NoSites)));
    }

    #[test]
    fn test_load_weight_config_partial_uses_defaults() {
        let file = write_temp(
            r#"{"criteria": {"technical": 0.5, "environmental": 0.3, "social": 0.2}}"#,
        );

        let config = load_weight_config(file.path()).unwrap();
        assert_eq!(config.criteria.technical, 0.5);
        assert_eq!(config.local.get(SubCriterion::Slope), Some(0.262));
    }

    #[test]
    fn test_load_weight_config_rejects_bad_local_sum() {
        let file = write_temp(
            r#"{
            "local": {
                "Solar Radiation": 0.5, "Slope": 0.5, "Proximity to Grid": 0.5, "Land Cost": 0.5,
                "Land Use": 0.258, "Distance from Protected Areas": 0.637, "Water Body Buffer": 0.105,
                "Distance from Roads": 0.637, "Proximity to Demand Centers": 0.258, "Population Density": 0.105
            }
        }"#,
        );

        assert!(matches!(
            load_weight_config(file.path()),
            Err(SuitabilityError::LocalWeightSum { .. })
        ));
    }

    #[test]
    fn test_load_weight_config_missing_file() {
        assert!(matches!(
            load_weight_config("/nonexistent/weights.json"),
            Err(SuitabilityError::Io(_))
        ));
    }
}
