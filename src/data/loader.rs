//! Load quiz datasets from GeoJSON
//!
//! Two entry points exist. `Dataset::from_geojson_str` is the strict path for
//! curated datasets: every feature must carry its own id and a geometry.
//! `Dataset::from_upload_str` is the lenient path for files a player brings:
//! ids are reassigned by position and names are looked up loosely.

use geo_types::{
    Coord, Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon,
    Point, Polygon,
};
use geojson::{feature::Id, GeoJson, Value};
use std::path::Path;
use thiserror::Error;

use super::feature::{Dataset, QuizFeature};
use crate::core::types::FeatureId;
use crate::geometry::GeoBounds;

const NAME_PROPERTY: &str = "name";
const RENDER_AS_POINT_PROPERTY: &str = "renderAsPoint";
const SNIPPET_CHARS: usize = 100;

/// Errors that reject a whole dataset before any session is built
#[derive(Debug, Error)]
pub enum LoadError {
    /// JSON parsing failed
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// Not valid GeoJSON, including unknown geometry types
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Expected a GeoJSON FeatureCollection")]
    NotAFeatureCollection,
    #[error("Missing id in feature {index}: {snippet} ...")]
    MissingId { index: usize, snippet: String },
    #[error("Duplicate feature id: {0}")]
    DuplicateId(FeatureId),
    #[error("Feature {index} has no geometry")]
    MissingGeometry { index: usize },
    #[error("Feature {index} has a position with fewer than two ordinates")]
    InvalidPosition { index: usize },
    #[error("Feature {index} has an empty geometry")]
    EmptyGeometry { index: usize },
    /// Catalog has no dataset under this key
    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),
}

/// What the loading collaborator reports to the UI
///
/// A failure is its own state so the UI never shows "loading" forever.
#[derive(Debug)]
pub enum LoadState {
    Loading,
    Ready(Dataset),
    Failed(LoadError),
}

impl LoadState {
    pub fn from_result(result: Result<Dataset, LoadError>) -> Self {
        match result {
            Ok(dataset) => Self::Ready(dataset),
            Err(error) => {
                tracing::warn!("Dataset failed to load: {}", error);
                Self::Failed(error)
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        match self {
            Self::Ready(dataset) => Some(dataset),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&LoadError> {
        match self {
            Self::Failed(error) => Some(error),
            _ => None,
        }
    }
}

impl Dataset {
    /// Strictly load a curated FeatureCollection
    pub fn from_geojson_str(json: &str) -> Result<Self, LoadError> {
        let features = parse_features(json)?;
        let mut quiz_features = Vec::with_capacity(features.len());

        for (index, feature) in features.into_iter().enumerate() {
            let id = match &feature.id {
                Some(id) => feature_id(id),
                None => {
                    return Err(LoadError::MissingId {
                        index,
                        snippet: snippet(&feature),
                    })
                }
            };
            let geometry = convert_feature_geometry(index, feature.geometry.as_ref())?;
            let name = feature
                .property(NAME_PROPERTY)
                .and_then(|value| value.as_str())
                .map(str::to_string);
            let render_as_point = feature
                .property(RENDER_AS_POINT_PROPERTY)
                .and_then(|value| value.as_bool())
                .unwrap_or(false);

            quiz_features.push(QuizFeature::new(id, name, geometry).rendered_as_point(render_as_point));
        }

        let dataset = Dataset::new(quiz_features)?;
        tracing::info!("Loaded dataset with {} features", dataset.len());
        Ok(dataset)
    }

    /// Strictly load a curated FeatureCollection from disk
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_geojson_str(&content)
    }

    /// Leniently load a player-provided FeatureCollection
    ///
    /// Ids become the feature's position, the name comes from the first
    /// property whose key is "name" in any case, and a missing name is
    /// replaced by `missing_name_label`. Geometry is still mandatory.
    pub fn from_upload_str(json: &str, missing_name_label: &str) -> Result<Self, LoadError> {
        let features = parse_features(json)?;
        let mut quiz_features = Vec::with_capacity(features.len());

        for (index, feature) in features.into_iter().enumerate() {
            let geometry = convert_feature_geometry(index, feature.geometry.as_ref())?;
            let name = feature
                .properties
                .as_ref()
                .and_then(|properties| {
                    properties
                        .iter()
                        .find(|(key, _)| key.eq_ignore_ascii_case(NAME_PROPERTY))
                        .and_then(|(_, value)| value.as_str())
                })
                .filter(|name| !name.is_empty())
                .unwrap_or(missing_name_label)
                .to_string();

            quiz_features.push(QuizFeature::new(index, Some(name), geometry));
        }

        let dataset = Dataset::new(quiz_features)?;
        tracing::info!("Loaded uploaded dataset with {} features", dataset.len());
        Ok(dataset)
    }
}

fn parse_features(json: &str) -> Result<Vec<geojson::Feature>, LoadError> {
    match json.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => Ok(collection.features),
        _ => Err(LoadError::NotAFeatureCollection),
    }
}

fn feature_id(id: &Id) -> FeatureId {
    match id {
        Id::String(text) => FeatureId::Text(text.clone()),
        Id::Number(number) => match number.as_i64() {
            Some(n) => FeatureId::Number(n),
            None => FeatureId::Text(number.to_string()),
        },
    }
}

fn snippet(feature: &geojson::Feature) -> String {
    serde_json::to_string(feature)
        .unwrap_or_default()
        .chars()
        .take(SNIPPET_CHARS)
        .collect()
}

fn convert_feature_geometry(
    index: usize,
    geometry: Option<&geojson::Geometry>,
) -> Result<Geometry<f64>, LoadError> {
    let geometry = geometry.ok_or(LoadError::MissingGeometry { index })?;
    let converted = convert_value(&geometry.value).ok_or(LoadError::InvalidPosition { index })?;
    if GeoBounds::of_geometry(&converted).is_none() {
        return Err(LoadError::EmptyGeometry { index });
    }
    Ok(converted)
}

/// GeoJSON value to geo geometry; `None` when a position is too short
fn convert_value(value: &Value) -> Option<Geometry<f64>> {
    let geometry = match value {
        Value::Point(position) => Geometry::Point(Point::from(coord(position)?)),
        Value::MultiPoint(positions) => Geometry::MultiPoint(MultiPoint::new(
            positions
                .iter()
                .map(|position| coord(position).map(Point::from))
                .collect::<Option<Vec<_>>>()?,
        )),
        Value::LineString(positions) => Geometry::LineString(line_string(positions)?),
        Value::MultiLineString(lines) => Geometry::MultiLineString(MultiLineString::new(
            lines.iter().map(|line| line_string(line)).collect::<Option<Vec<_>>>()?,
        )),
        Value::Polygon(rings) => Geometry::Polygon(polygon(rings)?),
        Value::MultiPolygon(polygons) => Geometry::MultiPolygon(MultiPolygon::new(
            polygons
                .iter()
                .map(|rings| polygon(rings))
                .collect::<Option<Vec<_>>>()?,
        )),
        Value::GeometryCollection(members) => Geometry::GeometryCollection(
            GeometryCollection::new_from(
                members
                    .iter()
                    .map(|member| convert_value(&member.value))
                    .collect::<Option<Vec<_>>>()?,
            ),
        ),
    };
    Some(geometry)
}

fn coord(position: &[f64]) -> Option<Coord<f64>> {
    match position {
        [x, y, ..] => Some(Coord { x: *x, y: *y }),
        _ => None,
    }
}

fn line_string(positions: &[Vec<f64>]) -> Option<LineString<f64>> {
    positions
        .iter()
        .map(|position| coord(position))
        .collect::<Option<Vec<_>>>()
        .map(LineString::new)
}

fn polygon(rings: &[Vec<Vec<f64>>]) -> Option<Polygon<f64>> {
    let mut rings = rings.iter().map(|ring| line_string(ring));
    let exterior = match rings.next() {
        Some(ring) => ring?,
        None => LineString::new(Vec::new()),
    };
    let interiors = rings.collect::<Option<Vec<_>>>()?;
    Some(Polygon::new(exterior, interiors))
}
