//! Quiz configuration with documented defaults
//!
//! Every tunable number of the scoring engine lives here so a dataset author
//! can adjust tolerances from a TOML file without touching code.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::geometry::GeometryKind;

/// Errors raised while reading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration for a quiz session
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    /// Near-miss tolerance per geometry kind, in kilometers
    ///
    /// A non-zero distance strictly below the threshold is scored as 0.
    /// Polygon kinds have no entry because containment already scores 0.
    pub thresholds: ThresholdConfig,

    /// Free-text name matching
    pub matching: MatchingConfig,

    /// Padding around the dataset used for the map's max bounds
    pub bounds: BoundsConfig,

    /// View scaling for the city-map mode
    pub city_map: CityMapConfig,

    /// Dataset assembly
    pub dataset: DatasetConfig,
}

/// Threshold table keyed by geometry kind
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct ThresholdConfig(pub BTreeMap<GeometryKind, f64>);

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self(BTreeMap::from([
            (GeometryKind::Point, 1.0),
            (GeometryKind::MultiPoint, 1.0),
            (GeometryKind::LineString, 1.0),
            (GeometryKind::MultiLineString, 1.0),
        ]))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Largest edit distance still accepted as a correct name
    ///
    /// The default of 1 forgives one typo or one dropped diacritic.
    pub max_edit_distance: usize,

    /// Whether a typed guess equal to the feature id also counts in write-name mode
    pub accept_id_match: bool,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            max_edit_distance: 1,
            accept_id_match: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BoundsConfig {
    /// Degrees of longitude added on each side
    pub padding_lng: f64,
    /// Degrees of latitude added on each side
    pub padding_lat: f64,
}

impl Default for BoundsConfig {
    fn default() -> Self {
        Self {
            padding_lng: 5.0,
            padding_lat: 3.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CityMapConfig {
    /// Scale of the feature box used for the opening view
    pub initial_scale: f64,
    /// Scale of the feature box the player may pan within
    pub max_scale: f64,
}

impl Default for CityMapConfig {
    fn default() -> Self {
        Self {
            initial_scale: 0.65,
            max_scale: 2.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// How many features a mixed "random" dataset keeps
    pub random_mix_limit: usize,
    /// Label shown for a feature without a name
    pub missing_name_label: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            random_mix_limit: 100,
            missing_name_label: "Missing feature name".to_string(),
        }
    }
}

impl QuizConfig {
    /// Load configuration from a TOML file
    pub fn load_from_toml(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self, ConfigError> {
        let config: QuizConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some((kind, km)) = self.thresholds.0.iter().find(|(_, km)| !(**km >= 0.0)) {
            return Err(ConfigError::Invalid(format!(
                "threshold for {} must be non-negative, got {}",
                kind, km
            )));
        }
        if !(self.bounds.padding_lng >= 0.0 && self.bounds.padding_lat >= 0.0) {
            return Err(ConfigError::Invalid("bounds padding must be non-negative".into()));
        }
        if !(self.city_map.initial_scale > 0.0 && self.city_map.max_scale > 0.0) {
            return Err(ConfigError::Invalid("city map scales must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_point_and_line_kinds() {
        let config = QuizConfig::default();
        assert_eq!(config.thresholds.0.get(&GeometryKind::Point), Some(&1.0));
        assert_eq!(config.thresholds.0.get(&GeometryKind::MultiLineString), Some(&1.0));
        assert!(config.thresholds.0.get(&GeometryKind::Polygon).is_none());
        assert_eq!(config.matching.max_edit_distance, 1);
        assert_eq!(config.dataset.random_mix_limit, 100);
    }

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = QuizConfig::parse_toml("").unwrap();
        assert_eq!(config.bounds.padding_lng, 5.0);
        assert_eq!(config.city_map.initial_scale, 0.65);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = QuizConfig::parse_toml(
            r#"
            [thresholds]
            point = 2.5

            [matching]
            accept_id_match = true
            "#,
        )
        .unwrap();
        assert_eq!(config.thresholds.0.get(&GeometryKind::Point), Some(&2.5));
        assert!(config.thresholds.0.get(&GeometryKind::LineString).is_none());
        assert!(config.matching.accept_id_match);
        assert_eq!(config.matching.max_edit_distance, 1);
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let result = QuizConfig::parse_toml("[thresholds]\nline_string = -1.0\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_unknown_geometry_kind_rejected() {
        let result = QuizConfig::parse_toml("[thresholds]\ncircle = 1.0\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
