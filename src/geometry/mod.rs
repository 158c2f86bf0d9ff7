//! Geodesic distance between quiz geometries and player guesses
//!
//! Coordinates are geographic `(longitude, latitude)` pairs in degrees.
//! Distances are kilometers over a spherical Earth.

mod bounds;
mod distance;
mod sphere;

pub use bounds::{clamp_lat, normalize_lng, GeoBounds};
pub use distance::{distance_to_geometry, DistanceResult, DistanceThresholds, GeometryError};
pub use sphere::closest_point_on_arc;

use geo_types::Geometry;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean Earth radius in kilometers, matching `geo`'s haversine constant
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// GeoJSON geometry type of a quiz feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryKind {
    Point,
    MultiPoint,
    LineString,
    MultiLineString,
    Polygon,
    MultiPolygon,
    GeometryCollection,
}

impl GeometryKind {
    pub fn of(geometry: &Geometry<f64>) -> Self {
        match geometry {
            Geometry::Point(_) => Self::Point,
            Geometry::MultiPoint(_) => Self::MultiPoint,
            Geometry::Line(_) | Geometry::LineString(_) => Self::LineString,
            Geometry::MultiLineString(_) => Self::MultiLineString,
            Geometry::Polygon(_) | Geometry::Rect(_) | Geometry::Triangle(_) => Self::Polygon,
            Geometry::MultiPolygon(_) => Self::MultiPolygon,
            Geometry::GeometryCollection(_) => Self::GeometryCollection,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Point => "Point",
            Self::MultiPoint => "MultiPoint",
            Self::LineString => "LineString",
            Self::MultiLineString => "MultiLineString",
            Self::Polygon => "Polygon",
            Self::MultiPolygon => "MultiPolygon",
            Self::GeometryCollection => "GeometryCollection",
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
