use thiserror::Error;

use crate::core::config::ConfigError;
use crate::data::LoadError;
use crate::quiz::GuessError;

#[derive(Error, Debug)]
pub enum QuizError {
    #[error("Dataset error: {0}")]
    Load(#[from] LoadError),

    #[error("Guess rejected: {0}")]
    Guess(#[from] GuessError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, QuizError>;
