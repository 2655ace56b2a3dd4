//! Session invariants - sanity checks that detect engine bugs.
//!
//! Every transition should preserve these. They are bug detectors for the
//! simulator, property tests and debug builds, not gameplay rules.

use std::collections::HashSet;

use crate::game::border_blitz::{BlitzResult, BorderBlitzState};
use crate::game::route::RouteState;
use crate::game::scoring::route_score;
use crate::game::session::Session;
use crate::game::silhouette::{SilhouettePhase, SilhouetteState, MIN_ROUND_POINTS, TINY_COUNTRIES};
use crate::game::sprint::{Outcome, Sprint, SprintGame};
use crate::game::common::TimedPhase;
use crate::world::{CountryCode, World};

/// Invariant violation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

#[derive(Default)]
struct Report(Vec<InvariantViolation>);

impl Report {
    fn check(&mut self, holds: bool, message: impl FnOnce() -> String) {
        if !holds {
            self.0.push(InvariantViolation { message: message() });
        }
    }
}

/// State-level consistency checks.
pub trait Invariants {
    /// Every violated invariant, or empty if all hold.
    fn check_invariants(&self, world: &World) -> Vec<InvariantViolation>;
}

/// Checks that hold across any single transition of any session.
#[must_use]
pub fn check_step<S: Session>(before: &S, after: &S) -> Vec<InvariantViolation> {
    let mut report = Report::default();
    report.check(after.progress() >= before.progress(), || {
        format!(
            "{} progress went backwards: {} -> {}",
            after.kind(),
            before.progress(),
            after.progress()
        )
    });
    report.check(after.phase_rank() >= before.phase_rank(), || {
        format!(
            "{} phase went backwards: {} -> {}",
            after.kind(),
            before.phase_rank(),
            after.phase_rank()
        )
    });
    report.check(!before.is_finished() || after.is_finished(), || {
        format!("{} left its terminal phase", after.kind())
    });
    report.0
}

fn distinct(codes: &[CountryCode]) -> bool {
    codes.iter().collect::<HashSet<_>>().len() == codes.len()
}

impl Invariants for RouteState {
    fn check_invariants(&self, world: &World) -> Vec<InvariantViolation> {
        let mut report = Report::default();
        let graph = world.graph();

        report.check(self.player_path.first() == Some(&self.start), || {
            "player path does not begin at the start".to_string()
        });
        report.check(self.player_path.last() == Some(&self.current), || {
            format!("current position {} is not the end of the path", self.current)
        });
        report.check(
            self.optimal_path.first() == Some(&self.start)
                && self.optimal_path.last() == Some(&self.end),
            || "optimal path endpoints do not match".to_string(),
        );
        for pair in self.player_path.windows(2) {
            report.check(graph.is_neighbor(pair[0], pair[1]), || {
                format!("path step {} -> {} crosses no border", pair[0], pair[1])
            });
        }
        report.check(distinct(&self.player_path), || {
            "player path revisits a country".to_string()
        });
        report.check(!self.player_path.contains(&self.end), || {
            "player path entered the destination".to_string()
        });
        report.check(self.consecutive_wrong <= self.wrong_attempts, || {
            format!(
                "consecutive wrong {} exceeds total wrong {}",
                self.consecutive_wrong, self.wrong_attempts
            )
        });
        report.check(self.route_start <= self.moves.len(), || {
            format!(
                "route begins at move {} of {}",
                self.route_start,
                self.moves.len()
            )
        });
        let accepted = self
            .route_moves()
            .iter()
            .filter(|m| m.result.is_correct())
            .count();
        report.check(accepted + 1 == self.player_path.len(), || {
            format!(
                "{accepted} accepted moves but path has {} entries",
                self.player_path.len()
            )
        });
        let expected = route_score(
            self.moves_taken(),
            self.wrong_attempts,
            self.hints_used,
            self.is_timeout(),
        );
        report.check(self.score == expected, || {
            format!("route score {} differs from recomputed {expected}", self.score)
        });
        if self.is_complete() {
            report.check(graph.is_neighbor(self.current, self.end), || {
                "completed route does not border the destination".to_string()
            });
        }
        report.0
    }
}

impl Invariants for SilhouetteState {
    fn check_invariants(&self, _world: &World) -> Vec<InvariantViolation> {
        let mut report = Report::default();

        let sum: u32 = self.rounds.iter().map(|r| r.points).sum();
        report.check(self.total_score == sum, || {
            format!("total score {} differs from round sum {sum}", self.total_score)
        });
        let countries: Vec<CountryCode> = self.rounds.iter().map(|r| r.country).collect();
        report.check(distinct(&countries), || "a country repeats across rounds".to_string());
        report.check(countries.iter().all(|c| !TINY_COUNTRIES.contains(c)), || {
            "a tiny country was drawn".to_string()
        });
        report.check(self.rounds.is_empty() || self.current_round < self.rounds.len(), || {
            format!("round cursor {} out of range", self.current_round)
        });

        for (i, round) in self.rounds.iter().enumerate() {
            report.check(!(round.solved && round.skipped), || {
                format!("round {i} both solved and skipped")
            });
            if i < self.current_round {
                report.check(round.is_done(), || format!("past round {i} undecided"));
            }
            if i > self.current_round {
                report.check(
                    !round.is_done() && round.guesses.is_empty() && round.hints_revealed.is_empty(),
                    || format!("future round {i} already touched"),
                );
            }
            if round.solved {
                report.check(round.points >= MIN_ROUND_POINTS, || {
                    format!("round {i} solved for only {} points", round.points)
                });
            } else {
                report.check(round.points == 0, || format!("unsolved round {i} has points"));
            }
            report.check(!round.guesses.contains(&round.country), || {
                format!("round {i} lists the answer as a wrong guess")
            });
            report.check(distinct(&round.guesses), || format!("round {i} repeats a guess"));
        }

        if let Some(round) = self.round() {
            match self.phase {
                SilhouettePhase::Playing { .. } => {
                    report.check(!round.is_done(), || "playing a decided round".to_string());
                }
                SilhouettePhase::RoundResult | SilhouettePhase::Resolution => {
                    report.check(round.is_done(), || "current round undecided".to_string());
                }
            }
        }
        report.0
    }
}

impl<G: SprintGame> Invariants for Sprint<G> {
    fn check_invariants(&self, _world: &World) -> Vec<InvariantViolation> {
        let mut report = Report::default();
        let count = |outcome| self.attempts.iter().filter(|a| a.outcome == outcome).count();
        let correct = count(Outcome::Correct);
        let advanced = correct + count(Outcome::Skipped);

        report.check(self.current_index <= self.queue.len(), || {
            format!("cursor {} beyond queue of {}", self.current_index, self.queue.len())
        });
        report.check(
            advanced <= self.current_index && self.current_index <= self.attempts.len(),
            || {
                format!(
                    "cursor {} inconsistent with {} attempts",
                    self.current_index,
                    self.attempts.len()
                )
            },
        );
        let trailing = self
            .attempts
            .iter()
            .rev()
            .take_while(|a| a.outcome == Outcome::Correct)
            .count();
        report.check(self.streak.current as usize == trailing, || {
            format!("streak {} but {trailing} trailing correct answers", self.streak.current)
        });
        report.check(self.streak.current <= self.streak.best, || {
            "current streak exceeds best streak".to_string()
        });
        let rules = self.config().rules;
        let ceiling = correct as u64 * u64::from(rules.base_points * rules.max_multiplier);
        report.check(u64::from(self.score) <= ceiling, || {
            format!("score {} above ceiling {ceiling}", self.score)
        });
        if self.current_index >= self.queue.len() {
            report.check(self.phase == TimedPhase::Resolution, || {
                "queue exhausted but still playing".to_string()
            });
        }
        report.0
    }
}

impl Invariants for BorderBlitzState {
    fn check_invariants(&self, world: &World) -> Vec<InvariantViolation> {
        let mut report = Report::default();

        report.check(self.neighbors == world.graph().neighbors(self.anchor), || {
            format!("stored neighbours of {} are stale", self.anchor)
        });
        report.check(self.found.iter().all(|c| self.neighbors.contains(c)), || {
            "found list holds a non-neighbour".to_string()
        });
        report.check(distinct(&self.found), || "found list repeats a country".to_string());
        report.check(self.hinted.iter().all(|c| self.found.contains(c)), || {
            "hinted neighbour missing from found".to_string()
        });
        report.check(self.consecutive_wrong <= self.wrong_attempts, || {
            "consecutive wrong exceeds total wrong".to_string()
        });
        let correct = self
            .guesses
            .iter()
            .filter(|g| g.result == BlitzResult::Correct)
            .count();
        let ceiling = correct as u64 * u64::from(self.config().points_per_neighbor);
        report.check(u64::from(self.score) <= ceiling, || {
            format!("score {} above ceiling {ceiling}", self.score)
        });
        if self.is_complete() && !self.neighbors.is_empty() {
            report.check(self.phase == TimedPhase::Resolution, || {
                "every neighbour found but still playing".to_string()
            });
        }
        report.0
    }
}

/// Assert all invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants<S: Invariants>(state: &S, world: &World) {
    let violations = state.check_invariants(world);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Session invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants<S: Invariants>(_state: &S, _world: &World) {}
