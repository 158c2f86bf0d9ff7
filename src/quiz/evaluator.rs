//! Per-mode correctness strategies
//!
//! The session state machine is the same for every mode; only the way a guess
//! is judged and scored changes. Each mode maps to one `Evaluator`.

use geo_types::{LineString, Point};
use std::fmt;
use thiserror::Error;

use super::matcher::NameMatcher;
use crate::core::config::QuizConfig;
use crate::core::types::{FeatureId, GuessKind, Mode};
use crate::data::QuizFeature;
use crate::geometry::{distance_to_geometry, DistanceThresholds, GeometryError};

/// A player's answer to the current question
#[derive(Debug, Clone, PartialEq)]
pub enum Guess {
    /// Feature the player clicked on
    Feature(FeatureId),
    /// Typed name
    Text(String),
    /// Dropped pin, as (longitude, latitude)
    Location(Point<f64>),
}

impl Guess {
    pub fn location(lng: f64, lat: f64) -> Self {
        Self::Location(Point::new(lng, lat))
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn kind(&self) -> GuessKind {
        match self {
            Self::Feature(_) => GuessKind::Feature,
            Self::Text(_) => GuessKind::Text,
            Self::Location(_) => GuessKind::Location,
        }
    }
}

/// Why a guess was refused without advancing the session
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GuessError {
    #[error("Expected a {expected} guess, got a {got} guess")]
    WrongKind { expected: GuessKind, got: GuessKind },

    #[error("Guess location ({lng}, {lat}) is not a coordinate on the map")]
    InvalidLocation { lng: f64, lat: f64 },

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// How outcomes add up to a score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scoring {
    /// Count correct answers
    Discrete,
    /// Sum miss distances in kilometers
    Distance,
}

/// Verdict on one guess
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub is_correct: bool,
    pub distance_km: Option<f64>,
    pub connecting_line: Option<LineString<f64>>,
}

impl Evaluation {
    pub fn verdict(is_correct: bool) -> Self {
        Self {
            is_correct,
            distance_km: None,
            connecting_line: None,
        }
    }
}

/// Judges a guess against the feature currently asked about
pub trait Evaluator: fmt::Debug {
    fn scoring(&self) -> Scoring;

    /// `name` is the feature's label, or a placeholder when it has none
    fn evaluate(
        &self,
        guess: &Guess,
        feature: &QuizFeature,
        name: &str,
    ) -> Result<Evaluation, GuessError>;
}

/// Point-and-click: the clicked feature must be the asked one
#[derive(Debug, Clone, Copy, Default)]
pub struct IdMatch;

impl Evaluator for IdMatch {
    fn scoring(&self) -> Scoring {
        Scoring::Discrete
    }

    fn evaluate(
        &self,
        guess: &Guess,
        feature: &QuizFeature,
        _name: &str,
    ) -> Result<Evaluation, GuessError> {
        match guess {
            Guess::Feature(id) => Ok(Evaluation::verdict(id == feature.id())),
            other => Err(GuessError::WrongKind {
                expected: GuessKind::Feature,
                got: other.kind(),
            }),
        }
    }
}

/// Write-name and city-map: fuzzy match on the typed name
#[derive(Debug, Clone, Copy, Default)]
pub struct NameMatch {
    matcher: NameMatcher,
    accept_id: bool,
}

impl NameMatch {
    pub fn new(matcher: NameMatcher) -> Self {
        Self {
            matcher,
            accept_id: false,
        }
    }

    /// Also accept a guess spelling out the feature id exactly
    pub fn accepting_id(mut self, accept_id: bool) -> Self {
        self.accept_id = accept_id;
        self
    }
}

impl Evaluator for NameMatch {
    fn scoring(&self) -> Scoring {
        Scoring::Discrete
    }

    fn evaluate(
        &self,
        guess: &Guess,
        feature: &QuizFeature,
        name: &str,
    ) -> Result<Evaluation, GuessError> {
        match guess {
            Guess::Text(text) => {
                let id_hit = self.accept_id && text.trim() == feature.id().to_string();
                Ok(Evaluation::verdict(id_hit || self.matcher.is_match(text, name)))
            }
            other => Err(GuessError::WrongKind {
                expected: GuessKind::Text,
                got: other.kind(),
            }),
        }
    }
}

/// Guess-location: geodesic miss distance with near-miss tolerance
///
/// Every outcome adds its distance to the score; an outcome counts as a hit
/// when the thresholded distance is exactly 0.
#[derive(Debug, Clone, Default)]
pub struct Proximity {
    thresholds: DistanceThresholds,
}

impl Proximity {
    pub fn new(thresholds: DistanceThresholds) -> Self {
        Self { thresholds }
    }
}

impl Evaluator for Proximity {
    fn scoring(&self) -> Scoring {
        Scoring::Distance
    }

    fn evaluate(
        &self,
        guess: &Guess,
        feature: &QuizFeature,
        _name: &str,
    ) -> Result<Evaluation, GuessError> {
        let Guess::Location(point) = guess else {
            return Err(GuessError::WrongKind {
                expected: GuessKind::Location,
                got: guess.kind(),
            });
        };
        if !(point.x().is_finite() && (-90.0..=90.0).contains(&point.y())) {
            return Err(GuessError::InvalidLocation {
                lng: point.x(),
                lat: point.y(),
            });
        }
        let result = distance_to_geometry(feature.geometry(), *point)?
            .with_thresholds(feature.kind(), &self.thresholds);
        Ok(Evaluation {
            is_correct: result.distance_km == 0.0,
            distance_km: Some(result.distance_km),
            connecting_line: Some(result.connecting_line),
        })
    }
}

/// Strategy used by `mode`, configured from `config`
pub fn evaluator_for(mode: Mode, config: &QuizConfig) -> Box<dyn Evaluator> {
    let matcher = NameMatcher::new(config.matching.max_edit_distance);
    match mode {
        Mode::PointAndClick => Box::new(IdMatch),
        Mode::WriteName => {
            Box::new(NameMatch::new(matcher).accepting_id(config.matching.accept_id_match))
        }
        Mode::CityMap => Box::new(NameMatch::new(matcher)),
        Mode::GuessLocation => Box::new(Proximity::new(DistanceThresholds::from(&config.thresholds))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::EARTH_RADIUS_KM;
    use geo_types::{line_string, point, polygon, Geometry};

    fn lugo() -> QuizFeature {
        QuizFeature::new(
            7_i64,
            Some("Lugo".into()),
            Geometry::Point(point!(x: -7.5560, y: 43.0121)),
        )
    }

    fn river() -> QuizFeature {
        QuizFeature::new(
            "river",
            Some("Equator".into()),
            Geometry::LineString(line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0)]),
        )
    }

    fn lat_for_km(km: f64) -> f64 {
        (km / EARTH_RADIUS_KM).to_degrees()
    }

    #[test]
    fn test_id_match_exact_only() {
        let feature = lugo();
        let hit = IdMatch.evaluate(&Guess::Feature(7_i64.into()), &feature, "Lugo").unwrap();
        let miss = IdMatch.evaluate(&Guess::Feature("7".into()), &feature, "Lugo").unwrap();
        assert!(hit.is_correct);
        assert!(!miss.is_correct);
    }

    #[test]
    fn test_id_match_rejects_text() {
        let result = IdMatch.evaluate(&Guess::text("Lugo"), &lugo(), "Lugo");
        assert_eq!(
            result,
            Err(GuessError::WrongKind {
                expected: GuessKind::Feature,
                got: GuessKind::Text
            })
        );
    }

    #[test]
    fn test_name_match_uses_label() {
        let evaluator = NameMatch::default();
        let feature = lugo();
        assert!(evaluator.evaluate(&Guess::text("lugo"), &feature, "Lugo").unwrap().is_correct);
        assert!(!evaluator.evaluate(&Guess::text("Vigo"), &feature, "Lugo").unwrap().is_correct);
    }

    #[test]
    fn test_name_match_id_policy() {
        let feature = lugo();
        let strict = NameMatch::default();
        let lenient = NameMatch::default().accepting_id(true);
        assert!(!strict.evaluate(&Guess::text("7"), &feature, "Lugo").unwrap().is_correct);
        assert!(lenient.evaluate(&Guess::text("7"), &feature, "Lugo").unwrap().is_correct);
    }

    #[test]
    fn test_proximity_clamps_half_kilometer_miss() {
        let evaluator = evaluator_for(Mode::GuessLocation, &QuizConfig::default());
        let result = evaluator
            .evaluate(&Guess::location(0.5, lat_for_km(0.5)), &river(), "Equator")
            .unwrap();
        assert_eq!(result.distance_km, Some(0.0));
        assert!(result.is_correct);
    }

    #[test]
    fn test_proximity_keeps_kilometer_and_a_half_miss() {
        let evaluator = evaluator_for(Mode::GuessLocation, &QuizConfig::default());
        let result = evaluator
            .evaluate(&Guess::location(0.5, lat_for_km(1.5)), &river(), "Equator")
            .unwrap();
        let distance = result.distance_km.unwrap();
        assert!((distance - 1.5).abs() < 1e-6);
        assert!(!result.is_correct);
        assert_eq!(result.connecting_line.unwrap().0.len(), 2);
    }

    #[test]
    fn test_proximity_rejects_non_finite_and_off_map_locations() {
        let evaluator = Proximity::default();
        for (lng, lat) in [(f64::NAN, 0.0), (0.0, f64::NAN), (f64::INFINITY, 0.0), (0.0, 91.0)] {
            let result = evaluator.evaluate(&Guess::location(lng, lat), &river(), "Equator");
            assert!(
                matches!(result, Err(GuessError::InvalidLocation { .. })),
                "({}, {}) should be rejected",
                lng,
                lat
            );
        }
        assert!(evaluator
            .evaluate(&Guess::location(190.0, 90.0), &river(), "Equator")
            .is_ok());
    }

    #[test]
    fn test_proximity_has_no_polygon_tolerance() {
        let region = QuizFeature::new(
            "region",
            Some("Square".into()),
            Geometry::Polygon(polygon![
                (x: 0.0, y: 0.0),
                (x: 1.0, y: 0.0),
                (x: 1.0, y: 1.0),
                (x: 0.0, y: 1.0),
            ]),
        );
        let evaluator = evaluator_for(Mode::GuessLocation, &QuizConfig::default());
        let result = evaluator
            .evaluate(&Guess::location(0.5, -lat_for_km(0.5)), &region, "Square")
            .unwrap();
        assert!((result.distance_km.unwrap() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_scoring_per_mode() {
        let config = QuizConfig::default();
        assert_eq!(evaluator_for(Mode::PointAndClick, &config).scoring(), Scoring::Discrete);
        assert_eq!(evaluator_for(Mode::CityMap, &config).scoring(), Scoring::Discrete);
        assert_eq!(evaluator_for(Mode::GuessLocation, &config).scoring(), Scoring::Distance);
    }
}
