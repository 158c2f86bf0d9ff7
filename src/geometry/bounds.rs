//! Geographic bounding boxes for framing the map view

use geo::{BoundingRect, Centroid};
use geo_types::{Geometry, LineString, Point, Rect};
use serde::{Deserialize, Serialize};

/// Axis-aligned box in degrees: `[min_lng, min_lat, max_lng, max_lat]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub min_lng: f64,
    pub min_lat: f64,
    pub max_lng: f64,
    pub max_lat: f64,
}

impl GeoBounds {
    pub const WORLD: GeoBounds = GeoBounds {
        min_lng: -180.0,
        min_lat: -90.0,
        max_lng: 180.0,
        max_lat: 90.0,
    };

    pub fn new(min_lng: f64, min_lat: f64, max_lng: f64, max_lat: f64) -> Self {
        Self {
            min_lng,
            min_lat,
            max_lng,
            max_lat,
        }
    }

    /// Box of a geometry, `None` when it has no coordinates
    pub fn of_geometry(geometry: &Geometry<f64>) -> Option<Self> {
        geometry.bounding_rect().map(Self::from)
    }

    /// Smallest box around every geometry yielded
    pub fn of_all<'a>(geometries: impl IntoIterator<Item = &'a Geometry<f64>>) -> Option<Self> {
        geometries
            .into_iter()
            .filter_map(Self::of_geometry)
            .reduce(|acc, next| acc.union(&next))
    }

    /// Frame a guess-location miss: the target plus the line to the guess
    ///
    /// Line longitudes are shifted by whole turns to lie within 180° of the
    /// target's center, so the box spans the short way round. The result may
    /// leave [-180, 180]; pass it through [`GeoBounds::clamp_map_bounds`].
    pub fn fit_outcome(target: &Geometry<f64>, connecting_line: &LineString<f64>) -> Option<Self> {
        let target_bounds = Self::of_geometry(target);
        let reference = target_bounds.map(|bounds| bounds.center().x());
        let line_bounds = connecting_line
            .coords()
            .map(|coord| {
                let lng = match reference {
                    Some(reference) => reference + normalize_lng(coord.x - reference),
                    None => coord.x,
                };
                Self::new(lng, coord.y, lng, coord.y)
            })
            .reduce(|acc, next| acc.union(&next));
        match (target_bounds, line_bounds) {
            (Some(a), Some(b)) => Some(a.union(&b)),
            (a, b) => a.or(b),
        }
    }

    pub fn union(&self, other: &Self) -> Self {
        Self {
            min_lng: self.min_lng.min(other.min_lng),
            min_lat: self.min_lat.min(other.min_lat),
            max_lng: self.max_lng.max(other.max_lng),
            max_lat: self.max_lat.max(other.max_lat),
        }
    }

    pub fn padded(&self, lng: f64, lat: f64) -> Self {
        Self {
            min_lng: self.min_lng - lng,
            min_lat: self.min_lat - lat,
            max_lng: self.max_lng + lng,
            max_lat: self.max_lat + lat,
        }
    }

    pub fn center(&self) -> Point<f64> {
        Point::new(
            (self.min_lng + self.max_lng) / 2.0,
            (self.min_lat + self.max_lat) / 2.0,
        )
    }

    /// Scale the box by `factor` around `origin`
    pub fn scaled_around(&self, origin: Point<f64>, factor: f64) -> Self {
        let scale = |value: f64, anchor: f64| anchor + (value - anchor) * factor;
        Self {
            min_lng: scale(self.min_lng, origin.x()),
            min_lat: scale(self.min_lat, origin.y()),
            max_lng: scale(self.max_lng, origin.x()),
            max_lat: scale(self.max_lat, origin.y()),
        }
    }

    /// Box of `geometry` scaled around its centroid, for the city-map view
    pub fn scaled(geometry: &Geometry<f64>, factor: f64) -> Option<Self> {
        let bounds = Self::of_geometry(geometry)?;
        let origin = geometry.centroid().unwrap_or_else(|| bounds.center());
        Some(bounds.scaled_around(origin, factor))
    }

    /// True when the box wraps past the antimeridian (west edge east of east edge)
    pub fn crosses_antimeridian(&self) -> bool {
        self.min_lng > self.max_lng
    }

    /// Bring a box into valid map range
    ///
    /// Latitude is clamped to [-90, 90] and longitude normalized into
    /// [-180, 180]. A box that ends up crossing the antimeridian, or that
    /// spanned a full turn before normalization, is widened to every
    /// longitude so the map never receives an inverted box.
    pub fn clamp_map_bounds(&self) -> Self {
        let min_lat = clamp_lat(self.min_lat);
        let max_lat = clamp_lat(self.max_lat);

        if self.max_lng - self.min_lng >= 360.0 {
            return Self {
                min_lat,
                max_lat,
                ..Self::WORLD
            };
        }

        let normalized = Self::new(
            normalize_lng(self.min_lng),
            min_lat,
            normalize_lng(self.max_lng),
            max_lat,
        );
        if normalized.crosses_antimeridian() {
            tracing::debug!(
                "Map bounds [{:.3}, {:.3}] cross the antimeridian, widening to all longitudes",
                self.min_lng,
                self.max_lng
            );
            return Self {
                min_lat,
                max_lat,
                ..Self::WORLD
            };
        }
        normalized
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.min_lng, self.min_lat, self.max_lng, self.max_lat]
    }
}

impl From<Rect<f64>> for GeoBounds {
    fn from(rect: Rect<f64>) -> Self {
        Self::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y)
    }
}

pub fn clamp_lat(lat: f64) -> f64 {
    lat.clamp(-90.0, 90.0)
}

/// Wrap longitude into [-180, 180], keeping +180 as is
pub fn normalize_lng(lng: f64) -> f64 {
    if (-180.0..=180.0).contains(&lng) {
        return lng;
    }
    let wrapped = (lng + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 && lng > 0.0 {
        180.0
    } else {
        wrapped
    }
}
