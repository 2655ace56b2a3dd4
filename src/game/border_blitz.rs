//! Border blitz: name every land neighbour of an anchor country.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::game::common::{percent, Difficulty, SkipResult, TimedPhase, SKIP_UNLOCK_WRONG};
use crate::game::session::{GameKind, Session};
use crate::rng::Rng;
use crate::world::{Country, CountryCode, NameResolver, Region, Tier, World};

/// Anchor used when no country qualifies at all.
pub const FALLBACK_ANCHOR: CountryCode = CountryCode::from_static("DE");

/// Scoring, timing and anchor-size table per difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlitzConfig {
    /// Game length in seconds.
    pub total_time: u32,
    /// Points per neighbour named.
    pub points_per_neighbor: u32,
    /// Points lost per wrong guess.
    pub wrong_penalty: u32,
    /// Points lost per hint.
    pub hint_penalty: u32,
    /// Fewest neighbours an anchor may have.
    pub min_neighbors: usize,
    /// Most neighbours an anchor may have.
    pub max_neighbors: usize,
}

impl BlitzConfig {
    /// Table entry for `difficulty`.
    #[must_use]
    pub const fn for_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self {
                total_time: 60,
                points_per_neighbor: 10,
                wrong_penalty: 0,
                hint_penalty: 5,
                min_neighbors: 3,
                max_neighbors: 5,
            },
            Difficulty::Medium => Self {
                total_time: 60,
                points_per_neighbor: 10,
                wrong_penalty: 3,
                hint_penalty: 10,
                min_neighbors: 4,
                max_neighbors: 6,
            },
            Difficulty::Hard => Self {
                total_time: 45,
                points_per_neighbor: 10,
                wrong_penalty: 5,
                hint_penalty: 15,
                min_neighbors: 7,
                max_neighbors: 99,
            },
        }
    }
}

/// Result tag for a border-blitz guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlitzResult {
    /// A neighbour not yet found.
    Correct,
    /// A real country that does not border the anchor.
    Wrong,
    /// A neighbour that was already found or hinted.
    AlreadyFound,
    /// Input that names no country.
    Invalid,
}

/// One recorded guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlitzGuess {
    /// Anchor at the time of the guess.
    pub anchor: CountryCode,
    /// Resolved country, if any.
    pub code: Option<CountryCode>,
    /// How it was judged.
    pub result: BlitzResult,
}

/// Full state of a border-blitz session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorderBlitzState {
    /// Current phase.
    pub phase: TimedPhase,
    /// Difficulty the session was created with.
    pub difficulty: Difficulty,
    /// Region anchors are drawn from.
    pub region: Region,
    /// Country whose neighbours are being named.
    pub anchor: CountryCode,
    /// The anchor's neighbours, in graph order.
    pub neighbors: Vec<CountryCode>,
    /// Neighbours found or revealed, in order.
    pub found: Vec<CountryCode>,
    /// Neighbours revealed by hints (a subset of `found`).
    pub hinted: Vec<CountryCode>,
    /// Every judged guess across anchors.
    pub guesses: Vec<BlitzGuess>,
    /// Wrong, repeated and invalid guesses.
    pub wrong_attempts: u32,
    /// Wrong guesses since the last correct one.
    pub consecutive_wrong: u32,
    /// Hints taken.
    pub hints_used: u32,
    /// Anchors skipped.
    pub skips_used: u32,
    /// Running score.
    pub score: u32,
}

/// Random anchor in `region` whose neighbour count suits `difficulty`.
///
/// Relaxes the neighbour-count range, then the tier ceiling, then both,
/// before giving up on the region entirely.
pub fn pick_anchor(
    world: &World,
    difficulty: Difficulty,
    region: Region,
    exclude: Option<CountryCode>,
    rng: &mut Rng,
) -> CountryCode {
    let config = BlitzConfig::for_difficulty(difficulty);
    let graph = world.graph();
    let degree = |c: &Country| graph.neighbors(c.code).len();
    let in_range = |c: &Country| (config.min_neighbors..=config.max_neighbors).contains(&degree(c));

    let tier = difficulty.max_tier();
    let attempts = [
        (tier, true),
        (tier, false),
        (Tier::Obscure, true),
        (Tier::Obscure, false),
    ];
    for (i, (max_tier, ranged)) in attempts.into_iter().enumerate() {
        let pool = world.catalog().pool_where(region, max_tier, |c| {
            degree(c) >= 1 && Some(c.code) != exclude && (!ranged || in_range(c))
        });
        if let Some(&anchor) = rng.choose(&pool) {
            if i > 0 {
                warn!(%region, %difficulty, relaxed = i, "anchor pool relaxed");
            }
            return anchor;
        }
    }
    warn!(%region, %difficulty, "no anchor candidates, using fallback");
    FALLBACK_ANCHOR
}

impl BorderBlitzState {
    /// Pick an anchor for `difficulty` inside `region`.
    #[must_use]
    pub fn create(world: &World, difficulty: Difficulty, region: Region, rng: &mut Rng) -> Self {
        let anchor = pick_anchor(world, difficulty, region, None, rng);
        Self::with_anchor(world, difficulty, region, anchor)
    }

    /// Session around a fixed anchor.
    #[must_use]
    pub fn with_anchor(
        world: &World,
        difficulty: Difficulty,
        region: Region,
        anchor: CountryCode,
    ) -> Self {
        let neighbors = world.graph().neighbors(anchor).to_vec();
        debug!(%anchor, neighbors = neighbors.len(), %difficulty, "border blitz created");
        Self {
            phase: TimedPhase::countdown(),
            difficulty,
            region,
            anchor,
            neighbors,
            found: Vec::new(),
            hinted: Vec::new(),
            guesses: Vec::new(),
            wrong_attempts: 0,
            consecutive_wrong: 0,
            hints_used: 0,
            skips_used: 0,
            score: 0,
        }
    }

    /// Scoring table for this session.
    #[must_use]
    pub const fn config(&self) -> BlitzConfig {
        BlitzConfig::for_difficulty(self.difficulty)
    }

    /// Seconds of play remaining.
    #[must_use]
    pub fn time_left(&self) -> u32 {
        self.phase.time_left(self.config().total_time)
    }

    /// Whether every neighbour is found.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.found.len() == self.neighbors.len()
    }

    /// Neighbours still to find, in graph order.
    pub fn unfound(&self) -> impl Iterator<Item = CountryCode> + '_ {
        self.neighbors.iter().copied().filter(|n| !self.found.contains(n))
    }

    /// Whether skipping is unlocked.
    #[must_use]
    pub const fn can_skip(&self) -> bool {
        self.phase.is_playing() && self.consecutive_wrong >= SKIP_UNLOCK_WRONG
    }

    /// Skip the countdown.
    #[must_use]
    pub fn start_playing(mut self) -> Self {
        if let TimedPhase::Countdown { .. } = self.phase {
            self.phase = TimedPhase::Playing {
                time_left: self.config().total_time,
            };
        }
        self
    }

    /// End the game now.
    #[must_use]
    pub fn end(mut self) -> Self {
        if self.phase != TimedPhase::Resolution {
            self.phase = TimedPhase::Resolution;
            debug!(score = self.score, found = self.found.len(), "border blitz ended");
        }
        self
    }

    fn finish_if_complete(self) -> Self {
        if self.is_complete() {
            debug!(anchor = %self.anchor, "all neighbours found");
            self.end()
        } else {
            self
        }
    }

    /// Judge a typed neighbour.
    ///
    /// Every guess while playing is recorded; anything but a new neighbour
    /// counts as wrong.
    #[must_use]
    pub fn submit(mut self, names: &dyn NameResolver, input: &str) -> (Self, BlitzResult) {
        if !self.phase.is_playing() {
            return (self, BlitzResult::Invalid);
        }
        let code = names.resolve_country(input);
        let result = match code {
            None => BlitzResult::Invalid,
            Some(c) if self.found.contains(&c) => BlitzResult::AlreadyFound,
            Some(c) if self.neighbors.contains(&c) => BlitzResult::Correct,
            Some(_) => BlitzResult::Wrong,
        };
        self.guesses.push(BlitzGuess {
            anchor: self.anchor,
            code,
            result,
        });
        trace!(anchor = %self.anchor, ?code, ?result, "border guess");

        let config = self.config();
        match (result, code) {
            (BlitzResult::Correct, Some(c)) => {
                self.found.push(c);
                self.consecutive_wrong = 0;
                self.score += config.points_per_neighbor;
                (self.finish_if_complete(), result)
            }
            _ => {
                self.wrong_attempts += 1;
                self.consecutive_wrong += 1;
                self.score = self.score.saturating_sub(config.wrong_penalty);
                (self, result)
            }
        }
    }

    /// Reveal a random unfound neighbour at the hint penalty.
    #[must_use]
    pub fn hint(mut self, rng: &mut Rng) -> (Self, Option<CountryCode>) {
        if !self.phase.is_playing() {
            return (self, None);
        }
        let unfound: Vec<CountryCode> = self.unfound().collect();
        let Some(&code) = rng.choose(&unfound) else {
            return (self, None);
        };
        self.found.push(code);
        self.hinted.push(code);
        self.hints_used += 1;
        self.score = self.score.saturating_sub(self.config().hint_penalty);
        trace!(anchor = %self.anchor, hint = %code, "border hint");
        (self.finish_if_complete(), Some(code))
    }

    /// Swap in a new anchor, keeping score, clock and totals.
    ///
    /// Locked until two consecutive wrong guesses.
    #[must_use]
    pub fn skip(mut self, world: &World, rng: &mut Rng) -> (Self, SkipResult) {
        if !self.can_skip() {
            return (self, SkipResult::Locked);
        }
        let anchor = pick_anchor(world, self.difficulty, self.region, Some(self.anchor), rng);
        debug!(from = %self.anchor, to = %anchor, "anchor skipped");
        self.anchor = anchor;
        self.neighbors = world.graph().neighbors(anchor).to_vec();
        self.found.clear();
        self.hinted.clear();
        self.consecutive_wrong = 0;
        self.skips_used += 1;
        (self, SkipResult::Skipped)
    }
}

/// End-of-game summary for a border-blitz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlitzStats {
    /// Final score.
    pub score: u32,
    /// Neighbours found or revealed for the final anchor.
    pub found: usize,
    /// Of those, revealed by hints.
    pub hinted: usize,
    /// Neighbours of the final anchor.
    pub total: usize,
    /// Whether the final anchor was completed.
    pub all_found: bool,
    /// Wrong, repeated and invalid guesses.
    pub wrong_attempts: u32,
    /// Hints taken.
    pub hints_used: u32,
    /// Anchors skipped.
    pub skips_used: u32,
    /// Correct guesses as a percentage of all guesses.
    pub accuracy: u32,
}

impl Session for BorderBlitzState {
    type Stats = BlitzStats;

    fn kind(&self) -> GameKind {
        GameKind::BorderBlitz
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn progress(&self) -> usize {
        self.guesses.len() + self.hints_used as usize + self.skips_used as usize
    }

    fn phase_rank(&self) -> u32 {
        self.phase.rank()
    }

    fn is_finished(&self) -> bool {
        self.phase == TimedPhase::Resolution
    }

    fn tick(mut self) -> Self {
        self.phase = self.phase.advance(self.config().total_time);
        self
    }

    fn stats(&self) -> BlitzStats {
        let correct = self
            .guesses
            .iter()
            .filter(|g| g.result == BlitzResult::Correct)
            .count();
        BlitzStats {
            score: self.score,
            found: self.found.len(),
            hinted: self.hinted.len(),
            total: self.neighbors.len(),
            all_found: self.is_complete(),
            wrong_attempts: self.wrong_attempts,
            hints_used: self.hints_used,
            skips_used: self.skips_used,
            accuracy: percent(correct, self.guesses.len()),
        }
    }
}
