//! Quiz engine: shuffling, name matching, per-mode evaluation and the session

mod evaluator;
mod matcher;
mod session;
mod shuffle;
mod summary;
pub mod view;

pub use evaluator::{
    evaluator_for, Evaluation, Evaluator, Guess, GuessError, IdMatch, NameMatch, Proximity, Scoring,
};
pub use matcher::{is_match, normalize_name, NameMatcher};
pub use session::{Outcome, Phase, Question, QuizSession, Score};
pub use shuffle::shuffle;
pub use summary::Summary;
