//! Quiz session state machine
//!
//! A session owns the dataset for its whole life, a shuffled queue of
//! questions consumed from the tail, the history of outcomes and the running
//! score. The only driving event is `submit_guess`; `reset` starts over.

use geo_types::LineString;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::fmt;

use super::evaluator::{evaluator_for, Evaluator, Guess, GuessError, Scoring};
use super::shuffle::shuffle;
use super::summary::Summary;
use crate::core::config::QuizConfig;
use crate::core::types::{FeatureId, Mode};
use crate::data::{Dataset, QuizFeature};

/// Lifecycle of a session once its dataset has loaded
///
/// Loading happens before construction and is tracked by `LoadState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Active,
    Complete,
}

/// Running score: correct answers, or kilometers missed in guess-location
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Score {
    Discrete { correct: usize, total: usize },
    Distance { total_km: f64 },
}

impl Score {
    fn zero(scoring: Scoring, total: usize) -> Self {
        match scoring {
            Scoring::Discrete => Self::Discrete { correct: 0, total },
            Scoring::Distance => Self::Distance { total_km: 0.0 },
        }
    }

    fn record(&mut self, outcome: &Outcome) {
        match self {
            Self::Discrete { correct, .. } => {
                if outcome.is_correct {
                    *correct += 1;
                }
            }
            Self::Distance { total_km } => *total_km += outcome.distance_km.unwrap_or(0.0),
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discrete { correct, total } => write!(f, "{}/{}", correct, total),
            Self::Distance { total_km } => write!(f, "{:.2} km", total_km),
        }
    }
}

/// Result of one answered question; never changed once recorded
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub feature_id: FeatureId,
    pub feature_name: String,
    pub is_correct: bool,
    /// Thresholded miss distance, guess-location only
    pub distance_km: Option<f64>,
    /// Guess -> nearest point of the target, guess-location only
    pub connecting_line: Option<LineString<f64>>,
}

/// The question currently asked
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Question<'a> {
    pub feature_id: &'a FeatureId,
    pub name: &'a str,
    /// 1-based position, for "3/20" style progress
    pub number: usize,
    pub total: usize,
}

#[derive(Debug)]
pub struct QuizSession<R: Rng = ChaCha8Rng> {
    dataset: Dataset,
    mode: Mode,
    evaluator: Box<dyn Evaluator>,
    missing_name_label: String,
    /// Indices into the dataset's features; the last one is asked next
    queue: Vec<usize>,
    history: Vec<Outcome>,
    score: Score,
    phase: Phase,
    rng: R,
}

impl QuizSession<ChaCha8Rng> {
    /// Session shuffled from OS entropy
    pub fn from_entropy(dataset: Dataset, mode: Mode, config: &QuizConfig) -> Self {
        Self::new(dataset, mode, config, ChaCha8Rng::from_entropy())
    }
}

impl<R: Rng> QuizSession<R> {
    /// Session using the mode's built-in evaluator
    pub fn new(dataset: Dataset, mode: Mode, config: &QuizConfig, rng: R) -> Self {
        Self::with_evaluator(
            dataset,
            mode,
            evaluator_for(mode, config),
            config.dataset.missing_name_label.clone(),
            rng,
        )
    }

    /// Session judged by a custom evaluator
    pub fn with_evaluator(
        dataset: Dataset,
        mode: Mode,
        evaluator: Box<dyn Evaluator>,
        missing_name_label: impl Into<String>,
        rng: R,
    ) -> Self {
        let score = Score::zero(evaluator.scoring(), dataset.len());
        let mut session = Self {
            dataset,
            mode,
            evaluator,
            missing_name_label: missing_name_label.into(),
            queue: Vec::new(),
            history: Vec::new(),
            score,
            phase: Phase::Active,
            rng,
        };
        session.start();
        session
    }

    fn start(&mut self) {
        self.queue = (0..self.dataset.len()).collect();
        shuffle(&mut self.queue, &mut self.rng);
        self.history.clear();
        self.score = Score::zero(self.evaluator.scoring(), self.dataset.len());
        self.phase = if self.queue.is_empty() {
            Phase::Complete
        } else {
            Phase::Active
        };
    }

    /// Resolve a guess against the current question
    ///
    /// Returns `Ok(None)` without touching anything once the quiz is
    /// complete. A guess of the wrong kind for this mode is refused before
    /// the evaluator sees it and leaves the question open.
    pub fn submit_guess(&mut self, guess: Guess) -> Result<Option<&Outcome>, GuessError> {
        let Some(&index) = self.queue.last() else {
            tracing::debug!("Ignoring guess submitted after the quiz completed");
            return Ok(None);
        };
        let expected = self.mode.guess_kind();
        if guess.kind() != expected {
            return Err(GuessError::WrongKind {
                expected,
                got: guess.kind(),
            });
        }

        let feature = &self.dataset.features()[index];
        let name = match feature.name() {
            Some(name) => name,
            None => {
                tracing::warn!("Feature {} has no name, using placeholder", feature.id());
                self.missing_name_label.as_str()
            }
        };
        let evaluation = self.evaluator.evaluate(&guess, feature, name)?;

        let outcome = Outcome {
            feature_id: feature.id().clone(),
            feature_name: name.to_string(),
            is_correct: evaluation.is_correct,
            distance_km: evaluation.distance_km,
            connecting_line: evaluation.connecting_line,
        };
        tracing::debug!(
            "Question {}/{} on {}: correct={} distance_km={:?}",
            self.history.len() + 1,
            self.dataset.len(),
            outcome.feature_id,
            outcome.is_correct,
            outcome.distance_km
        );

        self.score.record(&outcome);
        self.history.push(outcome);
        self.queue.pop();
        debug_assert_eq!(self.queue.len() + self.history.len(), self.dataset.len());

        if self.queue.is_empty() {
            self.phase = Phase::Complete;
            tracing::info!("Quiz complete in {} mode, score {}", self.mode, self.score);
        }
        Ok(self.history.last())
    }

    /// Start over with a freshly shuffled queue and a cleared history and score
    pub fn reset(&mut self) {
        self.start();
        tracing::info!("Quiz reset with {} questions", self.queue.len());
    }

    /// Release the session, handing back its dataset
    pub fn dispose(self) -> Dataset {
        self.dataset
    }

    pub fn current_feature(&self) -> Option<&QuizFeature> {
        self.queue
            .last()
            .map(|&index| &self.dataset.features()[index])
    }

    pub fn current_question(&self) -> Option<Question<'_>> {
        self.current_feature().map(|feature| Question {
            feature_id: feature.id(),
            name: feature.name().unwrap_or(&self.missing_name_label),
            number: self.history.len() + 1,
            total: self.dataset.len(),
        })
    }

    /// Remaining ids, next question last
    pub fn queue(&self) -> impl Iterator<Item = &FeatureId> {
        self.queue
            .iter()
            .map(|&index| self.dataset.features()[index].id())
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn answered(&self) -> usize {
        self.history.len()
    }

    pub fn history(&self) -> &[Outcome] {
        &self.history
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// End-of-game payload, available once complete
    pub fn summary(&self) -> Option<Summary> {
        self.is_complete().then(|| Summary {
            dataset_name: self.dataset.name().map(str::to_string),
            mode: self.mode,
            score: self.score,
            question_count: self.dataset.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::GuessKind;
    use crate::quiz::evaluator::Evaluation;
    use geo_types::{point, Geometry};
    use rand_chacha::rand_core::SeedableRng;

    /// Marks every guess correct and counts nothing else
    #[derive(Debug)]
    struct AlwaysRight;

    impl Evaluator for AlwaysRight {
        fn scoring(&self) -> Scoring {
            Scoring::Discrete
        }

        fn evaluate(
            &self,
            _guess: &Guess,
            _feature: &QuizFeature,
            _name: &str,
        ) -> Result<Evaluation, GuessError> {
            Ok(Evaluation::verdict(true))
        }
    }

    fn dataset(count: usize) -> Dataset {
        Dataset::new(
            (0..count)
                .map(|i| {
                    QuizFeature::new(
                        i,
                        Some(format!("Place {}", i)),
                        Geometry::Point(point!(x: i as f64, y: 0.0)),
                    )
                })
                .collect(),
        )
        .unwrap()
    }

    fn session(count: usize) -> QuizSession {
        QuizSession::with_evaluator(
            dataset(count),
            Mode::WriteName,
            Box::new(AlwaysRight),
            "Missing feature name",
            ChaCha8Rng::seed_from_u64(42),
        )
    }

    #[test]
    fn test_new_session_is_active_with_full_queue() {
        let session = session(5);
        assert_eq!(session.phase(), Phase::Active);
        assert_eq!(session.remaining(), 5);
        assert_eq!(session.score(), Score::Discrete { correct: 0, total: 5 });
        let question = session.current_question().unwrap();
        assert_eq!(question.number, 1);
        assert_eq!(question.total, 5);
    }

    #[test]
    fn test_guess_pops_the_asked_feature() {
        let mut session = session(3);
        let asked = session.current_question().unwrap().feature_id.clone();
        let outcome = session.submit_guess(Guess::text("anything")).unwrap().unwrap();
        assert_eq!(outcome.feature_id, asked);
        assert!(session.queue().all(|id| *id != asked));
        assert_eq!(session.remaining() + session.answered(), 3);
    }

    #[test]
    fn test_completion_and_no_double_advance() {
        let mut session = session(2);
        session.submit_guess(Guess::text("a")).unwrap();
        assert!(!session.is_complete());
        session.submit_guess(Guess::text("b")).unwrap();
        assert!(session.is_complete());
        assert!(session.current_question().is_none());

        assert_eq!(session.submit_guess(Guess::text("c")).unwrap(), None);
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.score(), Score::Discrete { correct: 2, total: 2 });
    }

    #[test]
    fn test_empty_dataset_starts_complete() {
        let mut session = session(0);
        assert!(session.is_complete());
        assert_eq!(session.submit_guess(Guess::text("x")).unwrap(), None);
        assert!(session.summary().is_some());
    }

    #[test]
    fn test_placeholder_label_for_unnamed_feature() {
        let dataset = Dataset::new(vec![QuizFeature::new(
            0_i64,
            None,
            Geometry::Point(point!(x: 0.0, y: 0.0)),
        )])
        .unwrap();
        let mut session = QuizSession::new(
            dataset,
            Mode::WriteName,
            &QuizConfig::default(),
            ChaCha8Rng::seed_from_u64(1),
        );
        assert_eq!(session.current_question().unwrap().name, "Missing feature name");
        let outcome = session
            .submit_guess(Guess::text("missing feature name"))
            .unwrap()
            .unwrap();
        assert!(outcome.is_correct);
        assert_eq!(outcome.feature_name, "Missing feature name");
    }

    #[test]
    fn test_wrong_guess_kind_leaves_state_untouched() {
        let mut session = QuizSession::new(
            dataset(2),
            Mode::PointAndClick,
            &QuizConfig::default(),
            ChaCha8Rng::seed_from_u64(3),
        );
        let result = session.submit_guess(Guess::text("Place 0"));
        assert!(matches!(result, Err(GuessError::WrongKind { .. })));
        assert_eq!(session.remaining(), 2);
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_mode_refuses_wrong_kind_even_with_lenient_evaluator() {
        let mut session = session(2);
        let result = session.submit_guess(Guess::location(0.0, 0.0));
        assert_eq!(
            result.map(|outcome| outcome.cloned()),
            Err(GuessError::WrongKind {
                expected: GuessKind::Text,
                got: GuessKind::Location
            })
        );
        assert_eq!(session.answered(), 0);
    }

    #[test]
    fn test_invalid_location_leaves_score_untouched() {
        let mut session = QuizSession::new(
            dataset(2),
            Mode::GuessLocation,
            &QuizConfig::default(),
            ChaCha8Rng::seed_from_u64(4),
        );
        let result = session.submit_guess(Guess::location(f64::NAN, 0.0));
        assert!(matches!(result, Err(GuessError::InvalidLocation { .. })));
        assert_eq!(session.remaining(), 2);
        assert!(session.history().is_empty());
        assert_eq!(session.score(), Score::Distance { total_km: 0.0 });

        session.submit_guess(Guess::location(0.0, 0.0)).unwrap();
        match session.score() {
            Score::Distance { total_km } => assert!(total_km.is_finite()),
            other => panic!("Expected distance score, got {:?}", other),
        }
    }

    #[test]
    fn test_summary_only_when_complete() {
        let mut session = session(1);
        assert!(session.summary().is_none());
        session.submit_guess(Guess::text("x")).unwrap();
        let summary = session.summary().unwrap();
        assert_eq!(summary.question_count, 1);
        assert_eq!(summary.mode, Mode::WriteName);
    }

    #[test]
    fn test_distance_score_accumulates() {
        let mut session = QuizSession::new(
            dataset(2),
            Mode::GuessLocation,
            &QuizConfig::default(),
            ChaCha8Rng::seed_from_u64(5),
        );
        let mut expected = 0.0;
        while let Some(feature) = session.current_feature() {
            let target = match feature.geometry() {
                Geometry::Point(p) => *p,
                _ => unreachable!(),
            };
            let outcome = session
                .submit_guess(Guess::location(target.x(), target.y() + 1.0))
                .unwrap()
                .unwrap();
            expected += outcome.distance_km.unwrap();
        }
        match session.score() {
            Score::Distance { total_km } => assert!((total_km - expected).abs() < 1e-9),
            other => panic!("Expected distance score, got {:?}", other),
        }
        assert!(expected > 200.0);
    }

    #[test]
    fn test_score_display() {
        assert_eq!(Score::Discrete { correct: 3, total: 4 }.to_string(), "3/4");
        assert_eq!(Score::Distance { total_km: 12.345 }.to_string(), "12.35 km");
    }
}
