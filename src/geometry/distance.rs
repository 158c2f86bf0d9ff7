//! Miss distance between a target geometry and a guessed location
//!
//! The recursion mirrors GeoJSON's structure: points are the base case,
//! lines project onto their nearest arc, polygons short-circuit on
//! containment and otherwise fall back to their rings, and every
//! multi-part or collection geometry keeps its closest member.

use geo::{HaversineDistance, Intersects};
use geo_types::{Coord, Geometry, LineString, MultiPolygon, Point, Polygon};
use std::collections::BTreeMap;
use thiserror::Error;

use super::bounds::normalize_lng;
use super::sphere::closest_point_on_arc;
use super::GeometryKind;
use crate::core::config::ThresholdConfig;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("Geometry has no coordinates to measure against")]
    Empty,
}

/// Distance from a guess to a geometry, plus the segment that visualizes it
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceResult {
    pub distance_km: f64,
    /// Guess -> nearest point; empty when the guess lies inside a polygon
    pub connecting_line: LineString<f64>,
}

impl DistanceResult {
    fn contained() -> Self {
        Self {
            distance_km: 0.0,
            connecting_line: LineString::new(Vec::new()),
        }
    }

    fn between(guess: Point<f64>, nearest: Point<f64>) -> Self {
        Self {
            distance_km: guess.haversine_distance(&nearest) / 1000.0,
            connecting_line: LineString::from(vec![guess.0, nearest.0]),
        }
    }

    /// Replace the distance with the thresholded one, keeping the line
    pub fn with_thresholds(mut self, kind: GeometryKind, thresholds: &DistanceThresholds) -> Self {
        self.distance_km = thresholds.apply(kind, self.distance_km);
        self
    }
}

/// Minimum geodesic distance from `guess` to `geometry`
///
/// The guess longitude is wrapped into [-180, 180] first, so a click on a
/// repeated world copy measures the same as the original. Fails only for
/// geometries without any coordinate. Ties keep the first member
/// encountered.
pub fn distance_to_geometry(
    geometry: &Geometry<f64>,
    guess: Point<f64>,
) -> Result<DistanceResult, GeometryError> {
    let guess = Point::new(normalize_lng(guess.x()), guess.y());
    nearest(geometry, guess).ok_or(GeometryError::Empty)
}

fn nearest(geometry: &Geometry<f64>, guess: Point<f64>) -> Option<DistanceResult> {
    match geometry {
        Geometry::Point(target) => Some(DistanceResult::between(guess, *target)),
        Geometry::Line(line) => Some(DistanceResult::between(
            guess,
            closest_point_on_arc(line.start_point(), line.end_point(), guess),
        )),
        Geometry::LineString(line) => nearest_on_line(line, guess),
        Geometry::MultiLineString(lines) => {
            closest_of(lines.iter().map(|line| nearest_on_line(line, guess)))
        }
        Geometry::Polygon(polygon) => nearest_to_polygon(polygon, guess),
        Geometry::MultiPolygon(polygons) => nearest_to_multi_polygon(polygons, guess),
        Geometry::Rect(rect) => nearest_to_polygon(&rect.to_polygon(), guess),
        Geometry::Triangle(triangle) => nearest_to_polygon(&triangle.to_polygon(), guess),
        Geometry::MultiPoint(points) => closest_of(
            points
                .iter()
                .map(|point| nearest(&Geometry::Point(*point), guess)),
        ),
        Geometry::GeometryCollection(collection) => {
            closest_of(collection.iter().map(|member| nearest(member, guess)))
        }
    }
}

fn nearest_to_polygon(polygon: &Polygon<f64>, guess: Point<f64>) -> Option<DistanceResult> {
    if polygon.exterior().0.is_empty() {
        return None;
    }
    if guess.intersects(polygon) {
        return Some(DistanceResult::contained());
    }
    nearest_on_rings(polygon, guess)
}

fn nearest_to_multi_polygon(
    polygons: &MultiPolygon<f64>,
    guess: Point<f64>,
) -> Option<DistanceResult> {
    let polygons: Vec<&Polygon<f64>> = polygons
        .iter()
        .filter(|polygon| !polygon.exterior().0.is_empty())
        .collect();
    if polygons.is_empty() {
        return None;
    }
    if polygons.iter().any(|polygon| guess.intersects(*polygon)) {
        return Some(DistanceResult::contained());
    }
    closest_of(polygons.into_iter().map(|polygon| nearest_on_rings(polygon, guess)))
}

/// Outline of a polygon as lines: exterior first, then holes
fn nearest_on_rings(polygon: &Polygon<f64>, guess: Point<f64>) -> Option<DistanceResult> {
    closest_of(
        std::iter::once(polygon.exterior())
            .chain(polygon.interiors())
            .map(|ring| nearest_on_line(ring, guess)),
    )
}

fn nearest_on_line(line: &LineString<f64>, guess: Point<f64>) -> Option<DistanceResult> {
    match line.0.as_slice() {
        [] => None,
        [only] => Some(DistanceResult::between(guess, Point::from(*only))),
        coords => closest_of(coords.windows(2).map(|pair| {
            let (start, end): (Coord<f64>, Coord<f64>) = (pair[0], pair[1]);
            let foot = closest_point_on_arc(start.into(), end.into(), guess);
            Some(DistanceResult::between(guess, foot))
        })),
    }
}

/// Keep the smallest result; the first one wins on ties
fn closest_of(candidates: impl Iterator<Item = Option<DistanceResult>>) -> Option<DistanceResult> {
    candidates.flatten().fold(None, |best, candidate| match best {
        Some(best) if best.distance_km <= candidate.distance_km => Some(best),
        _ => Some(candidate),
    })
}

/// Near-miss tolerance per geometry kind
///
/// Demanding pixel-level precision on a point or a river is unreasonable, so
/// any distance below the kind's threshold counts as a hit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DistanceThresholds {
    by_kind: BTreeMap<GeometryKind, f64>,
}

impl DistanceThresholds {
    /// No tolerance for any kind
    pub fn exact() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: GeometryKind, threshold_km: f64) -> Self {
        self.by_kind.insert(kind, threshold_km);
        self
    }

    pub fn get(&self, kind: GeometryKind) -> Option<f64> {
        self.by_kind.get(&kind).copied()
    }

    /// Clamp `distance_km` to 0 when it falls strictly below the kind's threshold
    pub fn apply(&self, kind: GeometryKind, distance_km: f64) -> f64 {
        match self.get(kind) {
            Some(threshold) if distance_km < threshold => 0.0,
            _ => distance_km,
        }
    }
}

impl From<&ThresholdConfig> for DistanceThresholds {
    fn from(config: &ThresholdConfig) -> Self {
        Self {
            by_kind: config.0.clone(),
        }
    }
}
