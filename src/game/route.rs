//! Route: walk from a start country to a destination, one land border at a
//! time, against a whole-game clock and a per-move clock.
//!
//! The score is recomputed from the move history after every transition and
//! lower is better (see [`crate::game::scoring`]).

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::game::common::{Difficulty, SkipResult, SKIP_UNLOCK_WRONG};
use crate::game::scoring::{route_score, Rating, ScoreBreakdown};
use crate::game::session::{GameKind, Session};
use crate::rng::Rng;
use crate::world::{Continent, CountryCode, NameResolver, Region, World};

/// Seconds the route is shown before play starts.
pub const REVEAL_SECONDS: u32 = 5;

/// Sampling attempts before falling back to a fixed pair.
const CREATE_ATTEMPTS: usize = 100;

/// Timing and length table per difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteConfig {
    /// Fewest border crossings on the sampled route.
    pub min_hops: usize,
    /// Most border crossings on the sampled route.
    pub max_hops: usize,
    /// Whole-game clock in seconds.
    pub execution_time: u32,
    /// Per-move clock in seconds.
    pub move_time: u32,
}

impl RouteConfig {
    /// Table entry for `difficulty`.
    #[must_use]
    pub const fn for_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self {
                min_hops: 2,
                max_hops: 3,
                execution_time: 90,
                move_time: 8,
            },
            Difficulty::Medium => Self {
                min_hops: 4,
                max_hops: 6,
                execution_time: 60,
                move_time: 5,
            },
            Difficulty::Hard => Self {
                min_hops: 7,
                max_hops: 12,
                execution_time: 45,
                move_time: 4,
            },
        }
    }

    /// Whether a route with `hops` crossings fits this difficulty.
    #[must_use]
    pub const fn accepts(&self, hops: usize) -> bool {
        hops >= self.min_hops && hops <= self.max_hops
    }
}

/// Known-good endpoints used when sampling fails.
#[must_use]
pub const fn fallback_pair(region: Region) -> (CountryCode, CountryCode) {
    let (a, b) = match region {
        Region::Only(Continent::Europe) => ("PT", "GR"),
        Region::Only(Continent::Asia) => ("TR", "CN"),
        Region::Only(Continent::Africa) => ("MA", "ZA"),
        Region::Only(Continent::SouthAmerica) => ("CO", "AR"),
        Region::Only(Continent::NorthAmerica) => ("US", "PA"),
        Region::Only(Continent::Oceania) | Region::All => ("PT", "CN"),
    };
    (CountryCode::from_static(a), CountryCode::from_static(b))
}

/// Phase of a route session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum RoutePhase {
    /// Route is being shown.
    Reveal {
        /// Seconds until play starts.
        time_left: u32,
    },
    /// Moves are accepted.
    Execution {
        /// Seconds left in the game.
        time_left: u32,
        /// Seconds left for the current move.
        move_time_left: u32,
    },
    /// The game is over.
    Resolution {
        /// How it ended.
        ending: RouteEnding,
    },
}

/// How a route session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteEnding {
    /// The player reached a neighbour of the destination.
    Completed,
    /// The game clock ran out.
    TimedOut,
}

/// Result tag for a submitted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveResult {
    /// Accepted: a new neighbour of the current position.
    Correct,
    /// The country is already on the player's path.
    AlreadyVisited,
    /// The country does not border the current position.
    NotNeighbor,
    /// Unrecognised input, or moves are not accepted right now.
    InvalidCountry,
    /// The destination itself was named; the route must end beside it.
    DestinationCountry,
}

impl MoveResult {
    /// Whether the move was accepted.
    #[must_use]
    pub const fn is_correct(self) -> bool {
        matches!(self, MoveResult::Correct)
    }
}

/// One recorded move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMove {
    /// Country the player named.
    pub code: CountryCode,
    /// How it was judged.
    pub result: MoveResult,
    /// Seconds into the execution phase.
    pub second: u32,
}

/// Full state of a route session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteState {
    /// Current phase.
    pub phase: RoutePhase,
    /// Difficulty the session was created with.
    pub difficulty: Difficulty,
    /// Region the endpoints were sampled from.
    pub region: Region,
    /// Start country.
    pub start: CountryCode,
    /// Destination country.
    pub end: CountryCode,
    /// Shortest route, both endpoints included.
    pub optimal_path: Vec<CountryCode>,
    /// Countries visited so far, starting with `start`.
    pub player_path: Vec<CountryCode>,
    /// Every judged move in the session, accepted or not, across skipped routes.
    pub moves: Vec<RouteMove>,
    /// Index in `moves` where the current route began.
    pub route_start: usize,
    /// Current position (last of `player_path`).
    pub current: CountryCode,
    /// Rejected moves and move timeouts.
    pub wrong_attempts: u32,
    /// Rejected moves since the last accepted one.
    pub consecutive_wrong: u32,
    /// Hints taken.
    pub hints_used: u32,
    /// Routes abandoned for a new one.
    pub skips_used: u32,
    /// Running score (lower is better).
    pub score: u32,
}

impl RouteState {
    /// Sample a route for `difficulty` inside `region`.
    ///
    /// Tries up to a hundred random starts, keeping the last route found and
    /// stopping early once one fits the difficulty's length range. Uses a
    /// fixed per-region pair only if no route was found at all.
    #[must_use]
    pub fn create(world: &World, difficulty: Difficulty, region: Region, rng: &mut Rng) -> Self {
        let config = RouteConfig::for_difficulty(difficulty);
        let mut found: Option<Vec<CountryCode>> = None;

        for _ in 0..CREATE_ATTEMPTS {
            let Some(start) = world.random_connected(region, rng) else {
                break;
            };
            let hops = config.min_hops + rng.below(config.max_hops - config.min_hops + 1);
            let candidates = world.countries_at_distance(start, hops, region);
            let Some(&end) = rng.choose(&candidates) else {
                continue;
            };
            let Some(path) = world.graph().shortest_path(start, end, None) else {
                continue;
            };
            let fits = config.accepts(path.len() - 1);
            found = Some(path);
            if fits {
                break;
            }
        }

        if let Some(path) = found
            && let (Some(&start), Some(&end)) = (path.first(), path.last())
        {
            return Self::new(difficulty, region, start, end, path);
        }

        let (start, end) = fallback_pair(region);
        warn!(%region, %start, %end, "route sampling failed, using fallback pair");
        Self::with_endpoints(world, difficulty, region, start, end)
    }

    /// Session between fixed endpoints.
    ///
    /// If the endpoints are not connected the optimal route is recorded as
    /// just the two endpoints.
    #[must_use]
    pub fn with_endpoints(
        world: &World,
        difficulty: Difficulty,
        region: Region,
        start: CountryCode,
        end: CountryCode,
    ) -> Self {
        let path = world
            .graph()
            .shortest_path(start, end, None)
            .unwrap_or_else(|| {
                warn!(%start, %end, "no land route between endpoints");
                vec![start, end]
            });
        Self::new(difficulty, region, start, end, path)
    }

    fn new(
        difficulty: Difficulty,
        region: Region,
        start: CountryCode,
        end: CountryCode,
        optimal_path: Vec<CountryCode>,
    ) -> Self {
        debug!(
            %start,
            %end,
            hops = optimal_path.len().saturating_sub(1),
            %difficulty,
            "route created"
        );
        Self {
            phase: RoutePhase::Reveal {
                time_left: REVEAL_SECONDS,
            },
            difficulty,
            region,
            start,
            end,
            optimal_path,
            player_path: vec![start],
            moves: Vec::new(),
            route_start: 0,
            current: start,
            wrong_attempts: 0,
            consecutive_wrong: 0,
            hints_used: 0,
            skips_used: 0,
            score: 0,
        }
    }

    /// Timing table for this session.
    #[must_use]
    pub const fn config(&self) -> RouteConfig {
        RouteConfig::for_difficulty(self.difficulty)
    }

    /// Whether the player reached the destination's border.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(
            self.phase,
            RoutePhase::Resolution {
                ending: RouteEnding::Completed
            }
        )
    }

    /// Whether the game clock ran out.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(
            self.phase,
            RoutePhase::Resolution {
                ending: RouteEnding::TimedOut
            }
        )
    }

    /// Crossings the player has made.
    #[must_use]
    pub fn moves_taken(&self) -> u32 {
        u32::try_from(self.player_path.len().saturating_sub(1)).unwrap_or(u32::MAX)
    }

    /// Countries the player must name on the optimal route.
    #[must_use]
    pub fn optimal_moves(&self) -> u32 {
        u32::try_from(self.optimal_path.len().saturating_sub(2)).unwrap_or(u32::MAX)
    }

    /// Moves judged on the current route.
    #[must_use]
    pub fn route_moves(&self) -> &[RouteMove] {
        self.moves.get(self.route_start..).unwrap_or(&[])
    }

    /// Seconds spent in the execution phase.
    #[must_use]
    pub fn elapsed(&self) -> u32 {
        let total = self.config().execution_time;
        match self.phase {
            RoutePhase::Reveal { .. } => 0,
            RoutePhase::Execution { time_left, .. } => total.saturating_sub(time_left),
            RoutePhase::Resolution { .. } => self.moves.last().map_or(0, |m| m.second),
        }
    }

    /// Whether skipping is unlocked.
    #[must_use]
    pub const fn can_skip(&self) -> bool {
        matches!(self.phase, RoutePhase::Execution { .. })
            && self.consecutive_wrong >= SKIP_UNLOCK_WRONG
    }

    fn rescore(mut self) -> Self {
        self.score = route_score(
            self.moves_taken(),
            self.wrong_attempts,
            self.hints_used,
            self.is_timeout(),
        );
        self
    }

    fn reset_move_clock(&mut self) {
        if let RoutePhase::Execution { move_time_left, .. } = &mut self.phase {
            *move_time_left = RouteConfig::for_difficulty(self.difficulty).move_time;
        }
    }

    /// Leave the reveal phase and start both clocks.
    #[must_use]
    pub fn start_execution(mut self) -> Self {
        if let RoutePhase::Reveal { .. } = self.phase {
            let config = self.config();
            self.phase = RoutePhase::Execution {
                time_left: config.execution_time,
                move_time_left: config.move_time,
            };
            debug!(start = %self.start, end = %self.end, "route execution started");
        }
        self
    }

    /// Judge a typed country.
    ///
    /// Unresolvable input (or input outside the execution phase) changes
    /// nothing. Every other move is recorded; rejected ones count as wrong.
    /// Reaching a neighbour of the destination completes the route.
    #[must_use]
    pub fn submit(
        mut self,
        world: &World,
        names: &dyn NameResolver,
        input: &str,
    ) -> (Self, MoveResult) {
        if !matches!(self.phase, RoutePhase::Execution { .. }) {
            return (self, MoveResult::InvalidCountry);
        }
        let Some(code) = names
            .resolve_country(input)
            .filter(|&c| world.catalog().contains(c))
        else {
            return (self, MoveResult::InvalidCountry);
        };

        let graph = world.graph();
        let result = if code == self.end {
            MoveResult::DestinationCountry
        } else if self.player_path.contains(&code) {
            MoveResult::AlreadyVisited
        } else if !graph.is_neighbor(self.current, code) {
            MoveResult::NotNeighbor
        } else {
            MoveResult::Correct
        };

        let second = self.elapsed();
        self.moves.push(RouteMove {
            code,
            result,
            second,
        });

        if result.is_correct() {
            self.player_path.push(code);
            self.current = code;
            self.consecutive_wrong = 0;
            self.reset_move_clock();
            if graph.is_neighbor(code, self.end) {
                self.phase = RoutePhase::Resolution {
                    ending: RouteEnding::Completed,
                };
                debug!(end = %self.end, moves = self.moves_taken(), "route completed");
            }
        } else {
            self.wrong_attempts += 1;
            self.consecutive_wrong += 1;
        }

        trace!(%code, ?result, current = %self.current, "route move");
        (self.rescore(), result)
    }

    /// Reveal the next country on a shortest route from the current position.
    ///
    /// No hint is given outside execution or when the destination is already
    /// one crossing away.
    #[must_use]
    pub fn hint(mut self, world: &World) -> (Self, Option<CountryCode>) {
        if !matches!(self.phase, RoutePhase::Execution { .. })
            || world.graph().is_neighbor(self.current, self.end)
        {
            return (self, None);
        }
        let next = world
            .graph()
            .shortest_path(self.current, self.end, None)
            .filter(|path| path.len() >= 3)
            .and_then(|path| path.get(1).copied());
        let Some(next) = next else {
            return (self, None);
        };
        self.hints_used += 1;
        trace!(hint = %next, "route hint");
        (self.rescore(), Some(next))
    }

    /// End the game because the game clock ran out.
    #[must_use]
    pub fn timeout(mut self) -> Self {
        if let RoutePhase::Execution { .. } = self.phase {
            self.phase = RoutePhase::Resolution {
                ending: RouteEnding::TimedOut,
            };
            debug!(moves = self.moves_taken(), "route timed out");
        }
        self.rescore()
    }

    /// The per-move clock ran out: one wrong attempt, fresh move clock.
    #[must_use]
    pub fn move_timeout(mut self) -> Self {
        if let RoutePhase::Execution { .. } = self.phase {
            self.wrong_attempts += 1;
            self.reset_move_clock();
            trace!(wrong = self.wrong_attempts, "route move timed out");
        }
        self.rescore()
    }

    /// Abandon this route for a freshly sampled one with the same settings.
    ///
    /// Locked until two consecutive wrong moves; a locked skip returns the
    /// state unchanged. The session continues: move history, wrong attempts,
    /// hints and the game clock carry over. The new route starts in
    /// execution with a fresh move clock.
    #[must_use]
    pub fn skip(self, world: &World, rng: &mut Rng) -> (Self, SkipResult) {
        let RoutePhase::Execution { time_left, .. } = self.phase else {
            return (self, SkipResult::Locked);
        };
        if !self.can_skip() {
            return (self, SkipResult::Locked);
        }
        debug!(start = %self.start, end = %self.end, skips = self.skips_used + 1, "route skipped");
        let fresh = Self::create(world, self.difficulty, self.region, rng);
        let next = Self {
            phase: RoutePhase::Execution {
                time_left,
                move_time_left: self.config().move_time,
            },
            route_start: self.moves.len(),
            moves: self.moves,
            wrong_attempts: self.wrong_attempts,
            hints_used: self.hints_used,
            skips_used: self.skips_used + 1,
            ..fresh
        };
        (next.rescore(), SkipResult::Skipped)
    }
}

/// End-of-game summary for a route session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteStats {
    /// Score line items.
    pub breakdown: ScoreBreakdown,
    /// Verbal grade.
    pub rating: Rating,
    /// Whether the route was completed.
    pub completed: bool,
    /// Whether the clock ran out.
    pub timed_out: bool,
    /// Rejected moves and move timeouts.
    pub wrong_attempts: u32,
    /// Hints taken.
    pub hints_used: u32,
    /// Routes skipped.
    pub skips_used: u32,
    /// Seconds spent playing.
    pub elapsed: u32,
}

impl Session for RouteState {
    type Stats = RouteStats;

    fn kind(&self) -> GameKind {
        GameKind::Route
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn progress(&self) -> usize {
        self.moves.len()
    }

    fn phase_rank(&self) -> u32 {
        match self.phase {
            RoutePhase::Reveal { .. } => 0,
            RoutePhase::Execution { .. } => 1,
            RoutePhase::Resolution { .. } => 2,
        }
    }

    fn is_finished(&self) -> bool {
        matches!(self.phase, RoutePhase::Resolution { .. })
    }

    fn tick(self) -> Self {
        match self.phase {
            RoutePhase::Reveal { time_left } if time_left <= 1 => self.start_execution(),
            RoutePhase::Reveal { time_left } => Self {
                phase: RoutePhase::Reveal {
                    time_left: time_left - 1,
                },
                ..self
            },
            RoutePhase::Execution { time_left, .. } if time_left <= 1 => self.timeout(),
            RoutePhase::Execution {
                time_left,
                move_time_left,
            } => {
                let ticked = Self {
                    phase: RoutePhase::Execution {
                        time_left: time_left - 1,
                        move_time_left: move_time_left.saturating_sub(1),
                    },
                    ..self
                };
                if move_time_left <= 1 {
                    ticked.move_timeout()
                } else {
                    ticked
                }
            }
            RoutePhase::Resolution { .. } => self,
        }
    }

    fn stats(&self) -> RouteStats {
        let breakdown = ScoreBreakdown::new(
            self.moves_taken(),
            self.wrong_attempts,
            self.hints_used,
            self.is_timeout(),
            self.optimal_moves(),
        );
        RouteStats {
            rating: Rating::of(breakdown.total, breakdown.optimal_moves),
            breakdown,
            completed: self.is_complete(),
            timed_out: self.is_timeout(),
            wrong_attempts: self.wrong_attempts,
            hints_used: self.hints_used,
            skips_used: self.skips_used,
            elapsed: self.elapsed(),
        }
    }
}
