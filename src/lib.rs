//! GeoQuiz - geography quiz scoring engine
//!
//! Loads GeoJSON datasets, measures how far a guess lands from a region,
//! judges typed names, and runs the quiz session from first question to
//! final score. Rendering and input handling live with the caller.

pub mod core;
pub mod data;
pub mod geometry;
pub mod quiz;

pub use crate::core::config::QuizConfig;
pub use crate::core::types::{FeatureId, Mode};
pub use crate::data::{Dataset, QuizFeature};
pub use crate::quiz::{Guess, QuizSession};
