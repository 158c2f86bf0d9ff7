//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a feature within one dataset
///
/// GeoJSON allows either a string or a number. Integral numbers keep their
/// numeric form so `3` and `"3"` stay distinct ids, as they are in the source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureId {
    Number(i64),
    Text(String),
}

impl FeatureId {
    /// Parse free input, preferring the numeric form when it fits
    pub fn parse_lenient(input: &str) -> Self {
        let trimmed = input.trim();
        match trimmed.parse::<i64>() {
            Ok(n) => Self::Number(n),
            Err(_) => Self::Text(trimmed.to_string()),
        }
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for FeatureId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<usize> for FeatureId {
    fn from(value: usize) -> Self {
        Self::Number(value as i64)
    }
}

impl From<&str> for FeatureId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FeatureId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Quiz mode selected by the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Click the region whose name is shown
    PointAndClick,
    /// Type the name of the highlighted region
    WriteName,
    /// Drop a pin where the named place is
    GuessLocation,
    /// Name the place shown on an unlabeled, zoomed-in map
    CityMap,
}

impl Mode {
    pub const ALL: [Mode; 4] = [
        Mode::PointAndClick,
        Mode::WriteName,
        Mode::GuessLocation,
        Mode::CityMap,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PointAndClick => "point-and-click",
            Self::WriteName => "write-name",
            Self::GuessLocation => "guess-location",
            Self::CityMap => "city-map",
        }
    }

    /// Kind of guess this mode accepts
    pub fn guess_kind(&self) -> GuessKind {
        match self {
            Self::PointAndClick => GuessKind::Feature,
            Self::WriteName | Self::CityMap => GuessKind::Text,
            Self::GuessLocation => GuessKind::Location,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a mode name is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown quiz mode: {0}")]
pub struct UnknownMode(pub String);

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| UnknownMode(s.to_string()))
    }
}

/// Shape of a player guess, used for mismatch reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessKind {
    Feature,
    Text,
    Location,
}

impl fmt::Display for GuessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Feature => f.write_str("feature id"),
            Self::Text => f.write_str("text"),
            Self::Location => f.write_str("location"),
        }
    }
}
