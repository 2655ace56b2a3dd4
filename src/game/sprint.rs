//! Timed-queue core shared by flags, capitals and the map quiz.
//!
//! A sprint walks a long pre-shuffled queue with one cursor. Correct answers
//! earn `base_points * multiplier`; wrong answers and skips cost a flat
//! penalty (never below zero) and reset the streak.

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::game::common::{percent, rounded_mean, Difficulty, SprintConfig, Streak, TimedPhase};
use crate::game::session::{GameKind, Session};
use crate::world::Region;

/// Per-game parameters of a sprint.
pub trait SprintGame: Debug + Clone + PartialEq + Eq {
    /// One queue entry.
    type Question: Debug + Clone + PartialEq + Eq + Serialize + DeserializeOwned;
    /// What the player answered.
    type Response: Debug + Clone + PartialEq + Eq + Serialize + DeserializeOwned;

    /// Which game this is.
    const KIND: GameKind;

    /// Scoring and timing for `difficulty`.
    fn config(difficulty: Difficulty) -> SprintConfig;
}

/// How a question was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Answered correctly.
    Correct,
    /// Answered wrongly.
    Wrong,
    /// Passed over.
    Skipped,
}

/// One recorded answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt<Q, R> {
    /// The question asked.
    pub question: Q,
    /// The player's answer (`None` for skips).
    pub response: Option<R>,
    /// How it was judged.
    pub outcome: Outcome,
    /// Seconds the question had been shown.
    pub seconds: u32,
}

/// Session state of a timed-queue game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Sprint<G: SprintGame> {
    /// Current phase.
    pub phase: TimedPhase,
    /// Difficulty the session was created with.
    pub difficulty: Difficulty,
    /// Region the questions were drawn from.
    pub region: Region,
    /// Pre-shuffled questions.
    pub queue: Vec<G::Question>,
    /// Cursor into `queue`.
    pub current_index: usize,
    /// Every judged answer, in order.
    pub attempts: Vec<Attempt<G::Question, G::Response>>,
    /// Running score.
    pub score: u32,
    /// Current and best streak.
    pub streak: Streak,
    /// Seconds the current question has been shown.
    pub question_seconds: u32,
}

impl<G: SprintGame> Sprint<G> {
    pub(crate) fn new(difficulty: Difficulty, region: Region, queue: Vec<G::Question>) -> Self {
        debug!(game = %G::KIND, queue = queue.len(), %difficulty, %region, "sprint created");
        Self {
            phase: TimedPhase::countdown(),
            difficulty,
            region,
            queue,
            current_index: 0,
            attempts: Vec::new(),
            score: 0,
            streak: Streak::default(),
            question_seconds: 0,
        }
    }

    /// Scoring and timing for this session.
    #[must_use]
    pub fn config(&self) -> SprintConfig {
        G::config(self.difficulty)
    }

    /// Fixed game length in seconds.
    #[must_use]
    pub fn total_duration(&self) -> u32 {
        self.config().total_time
    }

    /// Seconds of play remaining.
    #[must_use]
    pub fn time_left(&self) -> u32 {
        self.phase.time_left(self.total_duration())
    }

    /// The question under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&G::Question> {
        self.queue.get(self.current_index)
    }

    /// Multiplier the next correct answer earns.
    #[must_use]
    pub fn multiplier(&self) -> u32 {
        self.config().rules.multiplier(self.streak)
    }

    /// Skip the countdown. An empty queue ends the game at once.
    #[must_use]
    pub fn start_playing(mut self) -> Self {
        if let TimedPhase::Countdown { .. } = self.phase {
            self.phase = TimedPhase::Playing {
                time_left: self.total_duration(),
            };
            self.question_seconds = 0;
            debug!(game = %G::KIND, "sprint started");
        }
        self.end_if_exhausted()
    }

    fn end_if_exhausted(self) -> Self {
        if self.phase.is_playing() && self.current().is_none() {
            return self.end();
        }
        self
    }

    /// Finish the game now.
    #[must_use]
    pub fn end(mut self) -> Self {
        if self.phase != TimedPhase::Resolution {
            self.phase = TimedPhase::Resolution;
            debug!(game = %G::KIND, score = self.score, answered = self.attempts.len(), "sprint ended");
        }
        self
    }

    fn record(&mut self, response: Option<G::Response>, outcome: Outcome) {
        if let Some(question) = self.current().cloned() {
            self.attempts.push(Attempt {
                question,
                response,
                outcome,
                seconds: self.question_seconds,
            });
        }
    }

    fn advance(mut self) -> Self {
        self.current_index += 1;
        self.question_seconds = 0;
        if self.current_index >= self.queue.len() {
            return self.end();
        }
        self
    }

    /// Score a correct answer and move on.
    pub(crate) fn credit(mut self, response: G::Response) -> Self {
        let points = self.config().rules.points(self.streak);
        self.record(Some(response), Outcome::Correct);
        self.score += points;
        self.streak = self.streak.hit();
        trace!(game = %G::KIND, points, streak = self.streak.current, "sprint correct");
        self.advance()
    }

    /// Penalise a wrong answer, moving on only if `advance` is set.
    pub(crate) fn penalize(mut self, response: G::Response, advance: bool) -> Self {
        let penalty = self.config().wrong_penalty;
        self.record(Some(response), Outcome::Wrong);
        self.score = self.score.saturating_sub(penalty);
        self.streak = self.streak.miss();
        trace!(game = %G::KIND, penalty, "sprint wrong");
        if advance {
            self.advance()
        } else {
            self
        }
    }

    /// Pass over the current question at the skip penalty.
    #[must_use]
    pub fn skip(mut self) -> Self {
        if !self.phase.is_playing() {
            return self;
        }
        if self.current().is_none() {
            return self.end();
        }
        let penalty = self.config().skip_penalty;
        self.record(None, Outcome::Skipped);
        self.score = self.score.saturating_sub(penalty);
        self.streak = self.streak.miss();
        trace!(game = %G::KIND, penalty, "sprint skip");
        self.advance()
    }
}

/// End-of-game summary for a sprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SprintStats {
    /// Final score.
    pub score: u32,
    /// Correct answers.
    pub correct: usize,
    /// Wrong answers.
    pub wrong: usize,
    /// Skipped questions.
    pub skipped: usize,
    /// Attempts of any kind.
    pub total: usize,
    /// Longest streak.
    pub best_streak: u32,
    /// Mean seconds per attempt, rounded.
    pub avg_seconds: u32,
    /// Correct answers as a percentage of attempts.
    pub accuracy: u32,
}

impl<G: SprintGame> Session for Sprint<G> {
    type Stats = SprintStats;

    fn kind(&self) -> GameKind {
        G::KIND
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn progress(&self) -> usize {
        self.attempts.len()
    }

    fn phase_rank(&self) -> u32 {
        self.phase.rank()
    }

    fn is_finished(&self) -> bool {
        self.phase == TimedPhase::Resolution
    }

    fn tick(mut self) -> Self {
        let was_playing = self.phase.is_playing();
        self.phase = self.phase.advance(self.total_duration());
        match self.phase {
            TimedPhase::Playing { .. } if was_playing => self.question_seconds += 1,
            TimedPhase::Resolution if was_playing => {
                debug!(game = %G::KIND, score = self.score, "sprint time up");
            }
            _ => {}
        }
        self.end_if_exhausted()
    }

    fn stats(&self) -> SprintStats {
        let count = |outcome| self.attempts.iter().filter(|a| a.outcome == outcome).count();
        let correct = count(Outcome::Correct);
        let total = self.attempts.len();
        let seconds: u64 = self.attempts.iter().map(|a| u64::from(a.seconds)).sum();
        SprintStats {
            score: self.score,
            correct,
            wrong: count(Outcome::Wrong),
            skipped: count(Outcome::Skipped),
            total,
            best_streak: self.streak.best,
            avg_seconds: rounded_mean(seconds, total),
            accuracy: percent(correct, total),
        }
    }
}
