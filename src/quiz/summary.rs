//! End-of-game payload for the share/export action

use serde::Serialize;
use std::fmt;

use super::session::Score;
use crate::core::types::Mode;

const UNNAMED_DATASET: &str = "Custom dataset";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub dataset_name: Option<String>,
    pub mode: Mode,
    pub score: Score,
    pub question_count: usize,
}

impl Summary {
    /// "<dataset> - <mode>:" on the first line, the score on the second
    pub fn share_text(&self) -> String {
        format!(
            "{} - {}:\n{}",
            self.dataset_name.as_deref().unwrap_or(UNNAMED_DATASET),
            self.mode,
            self.score
        )
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.share_text())
    }
}
