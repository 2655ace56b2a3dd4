//! Route scoring: lower is better, measured against the optimal route.

use serde::{Deserialize, Serialize};

use crate::game::common::percent;

/// Cost of each correct border crossing.
pub const MOVE_COST: u32 = 1;
/// Cost of each rejected move.
pub const WRONG_MOVE_COST: u32 = 3;
/// Cost of each hint.
pub const HINT_COST: u32 = 2;
/// Flat cost of running out of time.
pub const TIMEOUT_COST: u32 = 5;

/// Route score: `moves + 3 * wrong + 2 * hints + (5 if timed out)`.
#[must_use]
pub const fn route_score(moves: u32, wrong: u32, hints: u32, timed_out: bool) -> u32 {
    let timeout = if timed_out { TIMEOUT_COST } else { 0 };
    moves * MOVE_COST + wrong * WRONG_MOVE_COST + hints * HINT_COST + timeout
}

/// Verbal grade for a finished route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    /// At or under the optimal cost.
    Perfect,
    /// Within 1.5x optimal.
    Great,
    /// Within 2.5x optimal.
    Good,
    /// Within 4x optimal.
    Ok,
    /// Worse than 4x optimal.
    KeepTrying,
}

impl Rating {
    /// Grade `score` against `optimal_moves` (treated as at least 1).
    #[must_use]
    pub fn of(score: u32, optimal_moves: u32) -> Self {
        let optimal = u64::from(optimal_moves.max(1));
        let score = u64::from(score);
        if score <= optimal {
            Rating::Perfect
        } else if 2 * score <= 3 * optimal {
            Rating::Great
        } else if 2 * score <= 5 * optimal {
            Rating::Good
        } else if score <= 4 * optimal {
            Rating::Ok
        } else {
            Rating::KeepTrying
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Rating::Perfect => "PERFECT",
            Rating::Great => "GREAT",
            Rating::Good => "GOOD",
            Rating::Ok => "OK",
            Rating::KeepTrying => "KEEP TRYING",
        }
    }
}

/// Line items of a route score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Correct crossings made.
    pub moves: u32,
    /// Points from rejected moves.
    pub wrong_penalty: u32,
    /// Points from hints.
    pub hint_penalty: u32,
    /// Points from timing out.
    pub timeout_penalty: u32,
    /// Sum of the above.
    pub total: u32,
    /// Crossings on the optimal route.
    pub optimal_moves: u32,
    /// `optimal / total` as a percentage (100 when the optimum is zero).
    pub efficiency: u32,
}

impl ScoreBreakdown {
    /// Itemise a route result.
    #[must_use]
    pub fn new(moves: u32, wrong: u32, hints: u32, timed_out: bool, optimal_moves: u32) -> Self {
        let total = route_score(moves, wrong, hints, timed_out);
        let efficiency = if optimal_moves > 0 {
            percent(optimal_moves as usize, total.max(1) as usize)
        } else {
            100
        };
        Self {
            moves,
            wrong_penalty: wrong * WRONG_MOVE_COST,
            hint_penalty: hints * HINT_COST,
            timeout_penalty: if timed_out { TIMEOUT_COST } else { 0 },
            total,
            optimal_moves,
            efficiency,
        }
    }
}
