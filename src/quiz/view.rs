//! Map framing handed to the rendering side

use crate::core::config::{BoundsConfig, CityMapConfig};
use crate::data::{Dataset, QuizFeature};
use crate::geometry::GeoBounds;

use super::session::Outcome;

/// Box the map opens on and the box it may not leave
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub initial: GeoBounds,
    pub max: GeoBounds,
}

/// Whole-dataset view: open on the data, allow some padding around it
pub fn dataset_view(dataset: &Dataset, config: &BoundsConfig) -> Option<MapView> {
    let bounds = dataset.bounds()?;
    let initial = bounds.clamp_map_bounds();
    let max = bounds
        .padded(config.padding_lng, config.padding_lat)
        .clamp_map_bounds();
    Some(MapView { initial, max })
}

/// City-map view: zoomed in on the one feature being asked
pub fn city_map_view(feature: &QuizFeature, config: &CityMapConfig) -> Option<MapView> {
    Some(MapView {
        initial: GeoBounds::scaled(feature.geometry(), config.initial_scale)?.clamp_map_bounds(),
        max: GeoBounds::scaled(feature.geometry(), config.max_scale)?.clamp_map_bounds(),
    })
}

/// Box framing a guess-location miss; `None` for hits, which need no reframing
pub fn outcome_view(feature: &QuizFeature, outcome: &Outcome) -> Option<GeoBounds> {
    let line = outcome.connecting_line.as_ref()?;
    if outcome.distance_km.unwrap_or(0.0) <= 0.0 {
        return None;
    }
    GeoBounds::fit_outcome(feature.geometry(), line).map(|bounds| bounds.clamp_map_bounds())
}
