//! Session engines for the six mini-games.
//!
//! Each engine is a state value plus transitions that consume it and return
//! the next state and a result tag:
//! - Route: walk a land route between two countries (lower score wins)
//! - Silhouette: identify outlines over fixed rounds with a hint ladder
//! - Flags, Capitals, Map quiz: timed queues with streak multipliers
//! - Border blitz: name every neighbour of an anchor country
//!
//! Engines never block or read clocks. Drivers call [`Session::tick`] once
//! per elapsed second.

mod border_blitz;
mod capitals;
mod common;
mod flags;
mod invariants;
mod map_quiz;
mod route;
mod scoring;
mod session;
mod silhouette;
mod sprint;

pub use border_blitz::{
    pick_anchor, BlitzConfig, BlitzGuess, BlitzResult, BlitzStats, BorderBlitzState,
    FALLBACK_ANCHOR,
};
pub use capitals::{CapitalClashState, CapitalQuestion, Capitals, Direction};
pub use common::{
    Answer, Difficulty, SkipResult, SprintConfig, Streak, StreakRules, TimedPhase,
    COUNTDOWN_SECONDS, MIN_QUEUE_LEN, SKIP_UNLOCK_WRONG,
};
pub use flags::{FlagSprintState, Flags};
pub use invariants::{assert_invariants, check_step, InvariantViolation, Invariants};
pub use map_quiz::{MapQuiz, MapQuizState};
pub use route::{
    fallback_pair, MoveResult, RouteConfig, RouteEnding, RouteMove, RoutePhase, RouteState,
    RouteStats, REVEAL_SECONDS,
};
pub use scoring::{route_score, Rating, ScoreBreakdown};
pub use session::{GameKind, Session};
pub use silhouette::{
    SilhouetteConfig, SilhouetteHint, SilhouettePhase, SilhouetteRound, SilhouetteState,
    SilhouetteStats, MIN_ROUND_POINTS, TINY_COUNTRIES,
};
pub use sprint::{Attempt, Outcome, Sprint, SprintGame, SprintStats};
