//! Pieces shared by the timed-queue engines.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::rng::Rng;
use crate::world::{Catalog, Country, CountryCode, Region, Tier};

/// Countdown length before a timed game starts.
pub const COUNTDOWN_SECONDS: u32 = 3;

/// Minimum length of a pre-shuffled question queue.
pub const MIN_QUEUE_LEN: usize = 80;

/// Consecutive wrong answers needed to unlock skipping where it is gated.
pub const SKIP_UNLOCK_WRONG: u32 = 2;

/// Difficulty level chosen at session creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Famous countries only, generous timers.
    Easy,
    /// Famous and moderately known countries.
    #[default]
    Medium,
    /// Every country, tight timers.
    Hard,
}

impl Difficulty {
    /// All difficulties in increasing order.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Highest tier admitted to candidate pools.
    #[must_use]
    pub const fn max_tier(self) -> Tier {
        match self {
            Difficulty::Easy => Tier::Famous,
            Difficulty::Medium => Tier::Moderate,
            Difficulty::Hard => Tier::Obscure,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        })
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown difficulty {s:?} (expected easy, medium or hard)"))
    }
}

/// Phase of a countdown-then-play game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum TimedPhase {
    /// Pre-game countdown.
    Countdown {
        /// Seconds before play starts.
        left: u32,
    },
    /// Answers are accepted.
    Playing {
        /// Seconds remaining in the game.
        time_left: u32,
    },
    /// The game is over.
    Resolution,
}

impl TimedPhase {
    /// Initial phase of every timed game.
    #[must_use]
    pub const fn countdown() -> Self {
        TimedPhase::Countdown {
            left: COUNTDOWN_SECONDS,
        }
    }

    /// Ordinal in the phase sequence.
    #[must_use]
    pub const fn rank(self) -> u32 {
        match self {
            TimedPhase::Countdown { .. } => 0,
            TimedPhase::Playing { .. } => 1,
            TimedPhase::Resolution => 2,
        }
    }

    /// Whether answers are accepted.
    #[must_use]
    pub const fn is_playing(self) -> bool {
        matches!(self, TimedPhase::Playing { .. })
    }

    /// Seconds of play left (full duration before play, zero after).
    #[must_use]
    pub const fn time_left(self, total: u32) -> u32 {
        match self {
            TimedPhase::Countdown { .. } => total,
            TimedPhase::Playing { time_left } => time_left,
            TimedPhase::Resolution => 0,
        }
    }

    /// Advance one second: countdown reaching zero starts play with
    /// `total` seconds, play reaching zero resolves.
    #[must_use]
    pub const fn advance(self, total: u32) -> Self {
        match self {
            TimedPhase::Countdown { left } if left <= 1 => TimedPhase::Playing { time_left: total },
            TimedPhase::Countdown { left } => TimedPhase::Countdown { left: left - 1 },
            TimedPhase::Playing { time_left } if time_left <= 1 => TimedPhase::Resolution,
            TimedPhase::Playing { time_left } => TimedPhase::Playing {
                time_left: time_left - 1,
            },
            TimedPhase::Resolution => TimedPhase::Resolution,
        }
    }
}

/// Result tag for a typed or clicked answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Answer {
    /// The answer was right.
    Correct,
    /// The answer named something, but the wrong thing.
    Wrong,
    /// The input could not be resolved, or the game is not accepting answers.
    Invalid,
}

/// Result of a gated skip request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipResult {
    /// The skip was applied.
    Skipped,
    /// Skipping is not available yet.
    Locked,
}

/// Current and best run of consecutive correct answers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    /// Current run length.
    pub current: u32,
    /// Longest run this session.
    pub best: u32,
}

impl Streak {
    /// Extend the run by one correct answer.
    #[must_use]
    pub fn hit(self) -> Self {
        let current = self.current + 1;
        Self {
            current,
            best: self.best.max(current),
        }
    }

    /// Break the run.
    #[must_use]
    pub const fn miss(self) -> Self {
        Self {
            current: 0,
            best: self.best,
        }
    }
}

/// Streak multiplier rules: `min(1 + streak / step, max_multiplier)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakRules {
    /// Points for a correct answer at multiplier 1.
    pub base_points: u32,
    /// Streak length per multiplier increment.
    pub step: u32,
    /// Multiplier ceiling.
    pub max_multiplier: u32,
}

impl StreakRules {
    /// Multiplier earned by the current streak.
    #[must_use]
    pub fn multiplier(&self, streak: Streak) -> u32 {
        let step = self.step.max(1);
        (1 + streak.current / step).min(self.max_multiplier)
    }

    /// Points a correct answer is worth right now.
    #[must_use]
    pub fn points(&self, streak: Streak) -> u32 {
        self.base_points * self.multiplier(streak)
    }
}

/// Shared scoring and timing table for the timed-queue games.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SprintConfig {
    /// Game length in seconds.
    pub total_time: u32,
    /// Streak scoring.
    pub rules: StreakRules,
    /// Points lost per wrong answer.
    pub wrong_penalty: u32,
    /// Points lost per skip.
    pub skip_penalty: u32,
}

/// Shuffle `pool`, then append fresh shuffles until at least `min_len` long.
pub(crate) fn build_queue<T: Clone>(pool: &[T], rng: &mut Rng, min_len: usize) -> Vec<T> {
    if pool.is_empty() {
        return Vec::new();
    }
    let mut queue = Vec::with_capacity(min_len + pool.len());
    while queue.len() < min_len {
        let mut round = pool.to_vec();
        rng.shuffle(&mut round);
        queue.extend(round);
    }
    queue
}

/// Candidate codes for `region` up to `max_tier`, relaxing the filters in
/// turn (tier, then region, then both) rather than returning nothing.
pub(crate) fn candidate_pool(
    catalog: &Catalog,
    region: Region,
    max_tier: Tier,
    keep: impl Fn(&Country) -> bool,
) -> Vec<CountryCode> {
    let attempts = [
        (region, max_tier),
        (region, Tier::Obscure),
        (Region::All, max_tier),
        (Region::All, Tier::Obscure),
    ];
    for (i, (r, t)) in attempts.into_iter().enumerate() {
        let pool = catalog.pool_where(r, t, &keep);
        if !pool.is_empty() {
            if i > 0 {
                warn!(region = %region, tier = max_tier.level(), "candidate pool relaxed");
            }
            return pool;
        }
    }
    Vec::new()
}

/// `part / total` as a rounded percentage (0 when `total` is 0).
#[must_use]
pub(crate) fn percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let rounded = (200 * part + total) / (2 * total);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

/// Rounded mean of `sum` over `count` items (0 when empty).
#[must_use]
pub(crate) fn rounded_mean(sum: u64, count: usize) -> u32 {
    let count = count as u64;
    if count == 0 {
        return 0;
    }
    u32::try_from((2 * sum + count) / (2 * count)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_parse() {
        assert_eq!("HARD".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("extreme".parse::<Difficulty>().is_err());
        assert_eq!(Difficulty::Easy.max_tier(), Tier::Famous);
    }

    #[test]
    fn test_timed_phase_advance() {
        let mut phase = TimedPhase::countdown();
        phase = phase.advance(60);
        assert_eq!(phase, TimedPhase::Countdown { left: 2 });
        phase = phase.advance(60).advance(60);
        assert_eq!(phase, TimedPhase::Playing { time_left: 60 });
        phase = phase.advance(60);
        assert_eq!(phase, TimedPhase::Playing { time_left: 59 });
        assert_eq!(
            TimedPhase::Playing { time_left: 1 }.advance(60),
            TimedPhase::Resolution
        );
        assert_eq!(TimedPhase::Resolution.advance(60), TimedPhase::Resolution);
    }

    #[test]
    fn test_streak_multiplier() {
        let rules = StreakRules {
            base_points: 10,
            step: 3,
            max_multiplier: 3,
        };
        let mut streak = Streak::default();
        assert_eq!(rules.points(streak), 10);
        for _ in 0..3 {
            streak = streak.hit();
        }
        assert_eq!(rules.multiplier(streak), 2);
        for _ in 0..10 {
            streak = streak.hit();
        }
        assert_eq!(rules.multiplier(streak), 3);
        let broken = streak.miss();
        assert_eq!(broken.current, 0);
        assert_eq!(broken.best, 13);
        assert_eq!(rules.multiplier(broken), 1);
    }

    #[test]
    fn test_build_queue_length_and_contents() {
        let mut rng = Rng::new(5);
        let pool = vec![1, 2, 3, 4, 5, 6, 7];
        let queue = build_queue(&pool, &mut rng, MIN_QUEUE_LEN);
        assert!(queue.len() >= MIN_QUEUE_LEN);
        assert!(queue.iter().all(|x| pool.contains(x)));
        // Each shuffled block is a permutation of the pool
        let mut first: Vec<_> = queue[..7].to_vec();
        first.sort_unstable();
        assert_eq!(first, pool);
        assert!(build_queue::<u8>(&[], &mut rng, 80).is_empty());
    }

    #[test]
    fn test_percent_rounding() {
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 2), 50);
        assert_eq!(percent(0, 0), 0);
        assert_eq!(rounded_mean(5, 2), 3);
        assert_eq!(rounded_mean(0, 0), 0);
    }
}
