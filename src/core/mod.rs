pub mod config;
pub mod error;
pub mod types;

pub use config::{ConfigError, QuizConfig};
pub use types::{FeatureId, GuessKind, Mode};
