//! Headless simulator: scripted bots play full sessions.
//!
//! The simulator drives every engine the way an interactive front end would
//! (one bot action, then one clock tick per simulated second) and checks the
//! session invariants after every step. Batches run in parallel with rayon.
//!
//! # Determinism
//!
//! Given the same world, seed and configuration, [`play`] always produces the
//! same [`SimResult`].

mod bot;

pub use bot::{Bot, BotProfile};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::game::{
    check_step, BorderBlitzState, CapitalClashState, Difficulty, FlagSprintState, GameKind,
    Invariants, MapQuizState, RouteState, Session, SilhouetteState,
};
use crate::rng::Rng;
use crate::world::{Region, World};

/// Configuration for simulated sessions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Difficulty every session is created with.
    pub difficulty: Difficulty,
    /// Region every session samples from.
    pub region: Region,
    /// How the bot plays.
    pub bot: BotProfile,
    /// Hard cap on driver steps per session.
    pub max_steps: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            region: Region::All,
            bot: BotProfile::default(),
            max_steps: 1_000,
        }
    }
}

/// Result of one simulated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimResult {
    /// Which game was played.
    pub kind: GameKind,
    /// Seed the session and bot were drawn from.
    pub seed: u64,
    /// Final score.
    pub score: u32,
    /// Final progress counter.
    pub progress: usize,
    /// Driver steps taken.
    pub steps: usize,
    /// Whether the session reached its terminal phase.
    pub finished: bool,
    /// Invariant violations seen along the way.
    pub violations: Vec<String>,
}

/// Play one session of `kind` to the end.
#[must_use]
pub fn play(kind: GameKind, seed: u64, world: &World, config: &SimConfig) -> SimResult {
    let mut rng = Rng::new(seed);
    let mut bot = Bot::new(world, config.bot, rng.fork());
    let (difficulty, region) = (config.difficulty, config.region);

    let run = match kind {
        GameKind::Route => drive(
            RouteState::create(world, difficulty, region, &mut rng),
            world,
            config.max_steps,
            |s| bot.play_route(s),
        ),
        GameKind::Silhouette => drive(
            SilhouetteState::create(world, difficulty, region, &mut rng),
            world,
            config.max_steps,
            |s| bot.play_silhouette(s),
        ),
        GameKind::Flags => drive(
            FlagSprintState::create(world, difficulty, region, &mut rng),
            world,
            config.max_steps,
            |s| bot.play_flags(s),
        ),
        GameKind::Capitals => drive(
            CapitalClashState::create(world, difficulty, region, &mut rng),
            world,
            config.max_steps,
            |s| bot.play_capitals(s),
        ),
        GameKind::MapQuiz => drive(
            MapQuizState::create(world, difficulty, region, &mut rng),
            world,
            config.max_steps,
            |s| bot.play_map_quiz(s),
        ),
        GameKind::BorderBlitz => drive(
            BorderBlitzState::create(world, difficulty, region, &mut rng),
            world,
            config.max_steps,
            |s| bot.play_border_blitz(s),
        ),
    };

    if !run.violations.is_empty() {
        warn!(%kind, seed, count = run.violations.len(), "invariant violations");
    }
    debug!(%kind, seed, score = run.score, steps = run.steps, "session simulated");

    SimResult {
        kind,
        seed,
        score: run.score,
        progress: run.progress,
        steps: run.steps,
        finished: run.finished,
        violations: run.violations,
    }
}

/// Outcome of [`drive`] before it is tagged with kind and seed.
struct Run {
    score: u32,
    progress: usize,
    steps: usize,
    finished: bool,
    violations: Vec<String>,
}

/// Alternate bot actions and clock ticks until the session ends.
fn drive<S, F>(mut state: S, world: &World, max_steps: usize, mut act: F) -> Run
where
    S: Session + Invariants,
    F: FnMut(S) -> S,
{
    let mut violations: Vec<String> = state
        .check_invariants(world)
        .into_iter()
        .map(|v| v.message)
        .collect();
    let mut steps = 0;

    while !state.is_finished() && steps < max_steps {
        let before = state.clone();
        let acted = act(state);
        let ticked = acted.clone().tick();

        violations.extend(
            check_step(&before, &acted)
                .into_iter()
                .chain(check_step(&acted, &ticked))
                .chain(ticked.check_invariants(world))
                .map(|v| v.message),
        );
        state = ticked;
        steps += 1;
    }

    Run {
        score: state.score(),
        progress: state.progress(),
        steps,
        finished: state.is_finished(),
        violations,
    }
}

/// Aggregates for one game across a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindStats {
    /// Which game.
    pub kind: GameKind,
    /// Sessions played.
    pub games: u64,
    /// Sessions that reached their terminal phase.
    pub finished: u64,
    /// Sum of final scores.
    pub total_score: u64,
    /// Lowest final score.
    pub min_score: Option<u32>,
    /// Highest final score.
    pub max_score: Option<u32>,
    /// Total driver steps.
    pub steps: u64,
    /// Total invariant violations.
    pub violations: u64,
}

impl KindStats {
    fn new(kind: GameKind) -> Self {
        Self {
            kind,
            games: 0,
            finished: 0,
            total_score: 0,
            min_score: None,
            max_score: None,
            steps: 0,
            violations: 0,
        }
    }

    /// Mean final score.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_score(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_score as f64 / self.games as f64
        }
    }

    fn add(&mut self, result: &SimResult) {
        self.games += 1;
        self.finished += u64::from(result.finished);
        self.total_score += u64::from(result.score);
        self.min_score = Some(self.min_score.map_or(result.score, |m| m.min(result.score)));
        self.max_score = Some(self.max_score.map_or(result.score, |m| m.max(result.score)));
        self.steps += result.steps as u64;
        self.violations += result.violations.len() as u64;
    }

    fn merge(&mut self, other: &Self) {
        self.games += other.games;
        self.finished += other.finished;
        self.total_score += other.total_score;
        self.min_score = match (self.min_score, other.min_score) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.max_score = match (self.max_score, other.max_score) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        self.steps += other.steps;
        self.violations += other.violations;
    }
}

/// Aggregated statistics over a batch of simulated sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchStats {
    /// Total sessions played.
    pub games_played: u64,
    /// Per-game aggregates, in [`GameKind::ALL`] order.
    pub per_game: Vec<KindStats>,
    /// First few violation messages, for reporting.
    pub sample_violations: Vec<String>,
}

/// How many violation messages a batch keeps verbatim.
const SAMPLE_VIOLATIONS: usize = 10;

impl Default for BatchStats {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchStats {
    /// Empty statistics.
    #[must_use]
    pub fn new() -> Self {
        Self {
            games_played: 0,
            per_game: GameKind::ALL.into_iter().map(KindStats::new).collect(),
            sample_violations: Vec::new(),
        }
    }

    /// Stats for one game.
    #[must_use]
    pub fn kind(&self, kind: GameKind) -> Option<&KindStats> {
        self.per_game.iter().find(|k| k.kind == kind)
    }

    /// Total invariant violations across all games.
    #[must_use]
    pub fn total_violations(&self) -> u64 {
        self.per_game.iter().map(|k| k.violations).sum()
    }

    /// Fold one session result in.
    pub fn add_result(&mut self, result: &SimResult) {
        self.games_played += 1;
        if let Some(stats) = self.per_game.iter_mut().find(|k| k.kind == result.kind) {
            stats.add(result);
        }
        let room = SAMPLE_VIOLATIONS.saturating_sub(self.sample_violations.len());
        self.sample_violations.extend(
            result
                .violations
                .iter()
                .take(room)
                .map(|v| format!("{} seed {}: {v}", result.kind, result.seed)),
        );
    }

    /// Merge another batch into this one.
    pub fn merge(&mut self, other: &Self) {
        self.games_played += other.games_played;
        for (mine, theirs) in self.per_game.iter_mut().zip(&other.per_game) {
            mine.merge(theirs);
        }
        let room = SAMPLE_VIOLATIONS.saturating_sub(self.sample_violations.len());
        self.sample_violations
            .extend(other.sample_violations.iter().take(room).cloned());
    }
}

/// The game played by batch entry `index` when cycling through every kind.
#[must_use]
pub fn kind_for_index(index: u64) -> GameKind {
    let len = GameKind::ALL.len() as u64;
    // index % len < 6, so the cast is lossless
    #[allow(clippy::cast_possible_truncation)]
    let slot = (index % len) as usize;
    GameKind::ALL[slot]
}

/// Play `games` sessions in parallel.
///
/// Session `i` uses seed `base_seed + i`. With `only` set every session plays
/// that game; otherwise sessions cycle through every game.
#[must_use]
pub fn run_batch(
    world: &World,
    games: u64,
    base_seed: u64,
    only: Option<GameKind>,
    config: &SimConfig,
) -> BatchStats {
    (0..games)
        .into_par_iter()
        .fold(BatchStats::new, |mut local, i| {
            let kind = only.unwrap_or_else(|| kind_for_index(i));
            let result = play(kind, base_seed.wrapping_add(i), world, config);
            local.add_result(&result);
            local
        })
        .reduce(BatchStats::new, |mut a, b| {
            a.merge(&b);
            a
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_game_finishes_cleanly() {
        let world = World::embedded().unwrap();
        let config = SimConfig::default();
        for kind in GameKind::ALL {
            let result = play(kind, 7, &world, &config);
            assert!(result.finished, "{kind} did not finish");
            assert!(result.violations.is_empty(), "{kind}: {:?}", result.violations);
            assert!(result.steps < config.max_steps);
        }
    }

    #[test]
    fn test_play_is_deterministic() {
        let world = World::embedded().unwrap();
        let config = SimConfig::default();
        for kind in GameKind::ALL {
            assert_eq!(
                play(kind, 99, &world, &config),
                play(kind, 99, &world, &config)
            );
        }
    }

    #[test]
    fn test_batch_counts_every_game() {
        let world = World::embedded().unwrap();
        let stats = run_batch(&world, 12, 1, None, &SimConfig::default());
        assert_eq!(stats.games_played, 12);
        for kind in GameKind::ALL {
            let k = stats.kind(kind).unwrap();
            assert_eq!(k.games, 2);
            assert_eq!(k.finished, 2);
        }
        assert_eq!(stats.total_violations(), 0);
        assert!(stats.sample_violations.is_empty());
    }

    #[test]
    fn test_batch_single_game() {
        let world = World::embedded().unwrap();
        let stats = run_batch(&world, 5, 3, Some(GameKind::Flags), &SimConfig::default());
        assert_eq!(stats.kind(GameKind::Flags).unwrap().games, 5);
        assert_eq!(stats.kind(GameKind::Route).unwrap().games, 0);
        assert_eq!(stats.kind(GameKind::Route).unwrap().min_score, None);
    }

    #[test]
    fn test_batch_merge_keeps_extremes() {
        let mut a = BatchStats::new();
        let mut b = BatchStats::new();
        let result = |score| SimResult {
            kind: GameKind::Flags,
            seed: 0,
            score,
            progress: 0,
            steps: 1,
            finished: true,
            violations: Vec::new(),
        };
        a.add_result(&result(30));
        b.add_result(&result(10));
        b.add_result(&result(50));
        a.merge(&b);
        let flags = a.kind(GameKind::Flags).unwrap();
        assert_eq!(flags.games, 3);
        assert_eq!(flags.min_score, Some(10));
        assert_eq!(flags.max_score, Some(50));
        assert_eq!(flags.total_score, 90);
    }
}
