//! Silhouette: name the country from its outline over a fixed number of
//! rounds, with an optional ladder of hints per round.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::game::common::{percent, Answer, Difficulty};
use crate::game::session::{GameKind, Session};
use crate::rng::Rng;
use crate::world::{Continent, CountryCode, NameResolver, Region, World};

/// Floor for a solved round.
pub const MIN_ROUND_POINTS: u32 = 10;

/// Most neighbours listed in the last hint.
const NEIGHBOR_HINT_LIMIT: usize = 3;

/// Countries too small to draw as an outline; never asked.
pub const TINY_COUNTRIES: [CountryCode; 22] = [
    CountryCode::from_static("AD"),
    CountryCode::from_static("MC"),
    CountryCode::from_static("SM"),
    CountryCode::from_static("VA"),
    CountryCode::from_static("LI"),
    CountryCode::from_static("MT"),
    CountryCode::from_static("SG"),
    CountryCode::from_static("BH"),
    CountryCode::from_static("MV"),
    CountryCode::from_static("SC"),
    CountryCode::from_static("CV"),
    CountryCode::from_static("ST"),
    CountryCode::from_static("AG"),
    CountryCode::from_static("BB"),
    CountryCode::from_static("DM"),
    CountryCode::from_static("GD"),
    CountryCode::from_static("KN"),
    CountryCode::from_static("LC"),
    CountryCode::from_static("VC"),
    CountryCode::from_static("WS"),
    CountryCode::from_static("TO"),
    CountryCode::from_static("MU"),
];

/// Scoring and timing table per difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SilhouetteConfig {
    /// Rounds per game.
    pub total_rounds: usize,
    /// Seconds per round.
    pub round_time: u32,
    /// Points for an unaided first-try solve.
    pub max_points: u32,
    /// Points lost per revealed hint.
    pub hint_penalty: u32,
    /// Points lost per wrong guess.
    pub guess_penalty: u32,
}

impl SilhouetteConfig {
    /// Table entry for `difficulty`.
    #[must_use]
    pub const fn for_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self {
                total_rounds: 5,
                round_time: 30,
                max_points: 100,
                hint_penalty: 15,
                guess_penalty: 10,
            },
            Difficulty::Medium => Self {
                total_rounds: 8,
                round_time: 20,
                max_points: 100,
                hint_penalty: 20,
                guess_penalty: 15,
            },
            Difficulty::Hard => Self {
                total_rounds: 10,
                round_time: 15,
                max_points: 100,
                hint_penalty: 25,
                guess_penalty: 20,
            },
        }
    }

    /// Points for a solve after `guesses` wrong guesses and `hints` hints.
    #[must_use]
    pub fn solve_points(&self, guesses: usize, hints: usize) -> u32 {
        let guesses = u32::try_from(guesses).unwrap_or(u32::MAX);
        let hints = u32::try_from(hints).unwrap_or(u32::MAX);
        self.max_points
            .saturating_sub(guesses.saturating_mul(self.guess_penalty))
            .saturating_sub(hints.saturating_mul(self.hint_penalty))
            .max(MIN_ROUND_POINTS)
    }
}

/// One unit of hint information, always offered in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SilhouetteHint {
    /// The country's continent.
    Continent(Continent),
    /// First letter of the English name.
    FirstLetter(char),
    /// The capital, looked up by country code when displayed.
    Capital(CountryCode),
    /// Up to three land neighbours.
    Neighbors(Vec<CountryCode>),
}

/// State of a single round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SilhouetteRound {
    /// Country to identify.
    pub country: CountryCode,
    /// Distinct wrong guesses.
    pub guesses: Vec<CountryCode>,
    /// Hints shown so far.
    pub hints_revealed: Vec<SilhouetteHint>,
    /// Hints not yet shown, front first.
    pub hints_available: Vec<SilhouetteHint>,
    /// Whether the country was named.
    pub solved: bool,
    /// Whether the round was skipped or ran out of time.
    pub skipped: bool,
    /// Points earned this round.
    pub points: u32,
}

impl SilhouetteRound {
    fn new(world: &World, country: CountryCode) -> Self {
        let mut hints = Vec::with_capacity(4);
        if let Some(record) = world.catalog().get(country) {
            hints.push(SilhouetteHint::Continent(record.continent));
            let initial = record.name.chars().next();
            if let Some(letter) = initial.and_then(|c| c.to_uppercase().next()) {
                hints.push(SilhouetteHint::FirstLetter(letter));
            }
            hints.push(SilhouetteHint::Capital(country));
        }
        let neighbors: Vec<CountryCode> = world
            .graph()
            .neighbors(country)
            .iter()
            .take(NEIGHBOR_HINT_LIMIT)
            .copied()
            .collect();
        if !neighbors.is_empty() {
            hints.push(SilhouetteHint::Neighbors(neighbors));
        }
        Self {
            country,
            guesses: Vec::new(),
            hints_revealed: Vec::new(),
            hints_available: hints,
            solved: false,
            skipped: false,
            points: 0,
        }
    }

    /// Whether the round has been decided.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.solved || self.skipped
    }
}

/// Phase of a silhouette session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum SilhouettePhase {
    /// Guesses are accepted for the current round.
    Playing {
        /// Seconds left in the round.
        time_left: u32,
    },
    /// The current round is decided; waiting for the next one.
    RoundResult,
    /// All rounds are done.
    Resolution,
}

/// Full state of a silhouette session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SilhouetteState {
    /// Current phase.
    pub phase: SilhouettePhase,
    /// Difficulty the session was created with.
    pub difficulty: Difficulty,
    /// Region the countries were drawn from.
    pub region: Region,
    /// Every round, decided or not.
    pub rounds: Vec<SilhouetteRound>,
    /// Index of the current round.
    pub current_round: usize,
    /// Sum of round points.
    pub total_score: u32,
}

fn is_tiny(code: CountryCode) -> bool {
    TINY_COUNTRIES.contains(&code)
}

impl SilhouetteState {
    /// Draw the rounds for `difficulty` inside `region`.
    ///
    /// Tops the list up from the whole world when the region is too small.
    #[must_use]
    pub fn create(world: &World, difficulty: Difficulty, region: Region, rng: &mut Rng) -> Self {
        let config = SilhouetteConfig::for_difficulty(difficulty);
        let max_tier = difficulty.max_tier();
        let catalog = world.catalog();

        let mut picks = catalog.pool_where(region, max_tier, |c| !is_tiny(c.code));
        rng.shuffle(&mut picks);
        picks.truncate(config.total_rounds);

        if picks.len() < config.total_rounds {
            let mut extra =
                catalog.pool_where(Region::All, max_tier, |c| !is_tiny(c.code) && !picks.contains(&c.code));
            rng.shuffle(&mut extra);
            warn!(
                %region,
                have = picks.len(),
                want = config.total_rounds,
                "silhouette pool short, padding from all regions"
            );
            picks.extend(extra.into_iter().take(config.total_rounds - picks.len()));
        }

        let rounds: Vec<SilhouetteRound> = picks
            .into_iter()
            .map(|code| SilhouetteRound::new(world, code))
            .collect();
        let phase = if rounds.is_empty() {
            SilhouettePhase::Resolution
        } else {
            SilhouettePhase::Playing {
                time_left: config.round_time,
            }
        };
        debug!(rounds = rounds.len(), %difficulty, %region, "silhouette created");

        Self {
            phase,
            difficulty,
            region,
            rounds,
            current_round: 0,
            total_score: 0,
        }
    }

    /// Scoring table for this session.
    #[must_use]
    pub const fn config(&self) -> SilhouetteConfig {
        SilhouetteConfig::for_difficulty(self.difficulty)
    }

    /// The round being played or just decided.
    #[must_use]
    pub fn round(&self) -> Option<&SilhouetteRound> {
        self.rounds.get(self.current_round)
    }

    /// Whether this is the last round.
    #[must_use]
    pub fn is_last_round(&self) -> bool {
        self.current_round + 1 >= self.rounds.len()
    }

    /// Judge a typed country name.
    ///
    /// Repeated wrong guesses are recorded once.
    #[must_use]
    pub fn submit(mut self, names: &dyn NameResolver, input: &str) -> (Self, Answer) {
        if !matches!(self.phase, SilhouettePhase::Playing { .. }) {
            return (self, Answer::Invalid);
        }
        let Some(code) = names.resolve_country(input) else {
            return (self, Answer::Invalid);
        };
        let config = self.config();
        let Some(round) = self.rounds.get_mut(self.current_round) else {
            return (self, Answer::Invalid);
        };

        if code == round.country {
            let points = config.solve_points(round.guesses.len(), round.hints_revealed.len());
            round.solved = true;
            round.points = points;
            self.total_score += points;
            self.phase = SilhouettePhase::RoundResult;
            trace!(%code, points, "silhouette solved");
            (self, Answer::Correct)
        } else {
            if !round.guesses.contains(&code) {
                round.guesses.push(code);
            }
            trace!(%code, "silhouette wrong guess");
            (self, Answer::Wrong)
        }
    }

    /// Reveal the next hint; `None` once all are shown.
    #[must_use]
    pub fn hint(mut self) -> (Self, Option<SilhouetteHint>) {
        if !matches!(self.phase, SilhouettePhase::Playing { .. }) {
            return (self, None);
        }
        let Some(round) = self.rounds.get_mut(self.current_round) else {
            return (self, None);
        };
        if round.hints_available.is_empty() {
            return (self, None);
        }
        let hint = round.hints_available.remove(0);
        round.hints_revealed.push(hint.clone());
        (self, Some(hint))
    }

    /// Give up the current round (also what the round clock does).
    #[must_use]
    pub fn skip(mut self) -> Self {
        if !matches!(self.phase, SilhouettePhase::Playing { .. }) {
            return self;
        }
        if let Some(round) = self.rounds.get_mut(self.current_round) {
            round.skipped = true;
            round.points = 0;
            trace!(country = %round.country, "silhouette round skipped");
        }
        self.phase = SilhouettePhase::RoundResult;
        self
    }

    /// Move past a decided round, or finish after the last one.
    #[must_use]
    pub fn next_round(mut self) -> Self {
        if self.phase != SilhouettePhase::RoundResult {
            return self;
        }
        if self.is_last_round() {
            self.phase = SilhouettePhase::Resolution;
            debug!(score = self.total_score, "silhouette finished");
        } else {
            self.current_round += 1;
            self.phase = SilhouettePhase::Playing {
                time_left: self.config().round_time,
            };
        }
        self
    }
}

/// End-of-game summary for a silhouette session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SilhouetteStats {
    /// Points scored.
    pub total_score: u32,
    /// Points available.
    pub max_possible: u32,
    /// `total_score / max_possible` as a percentage.
    pub percentage: u32,
    /// Rounds solved.
    pub solved: usize,
    /// Rounds skipped or timed out.
    pub skipped: usize,
    /// Rounds in the game.
    pub total_rounds: usize,
    /// Hints revealed across rounds.
    pub total_hints: usize,
    /// Distinct wrong guesses across rounds.
    pub total_wrong: usize,
}

impl Session for SilhouetteState {
    type Stats = SilhouetteStats;

    fn kind(&self) -> GameKind {
        GameKind::Silhouette
    }

    fn score(&self) -> u32 {
        self.total_score
    }

    fn progress(&self) -> usize {
        self.rounds.iter().filter(|r| r.is_done()).count()
    }

    fn phase_rank(&self) -> u32 {
        let round = u32::try_from(self.current_round).unwrap_or(u32::MAX / 2);
        match self.phase {
            SilhouettePhase::Playing { .. } => round * 2,
            SilhouettePhase::RoundResult => round * 2 + 1,
            SilhouettePhase::Resolution => u32::try_from(self.rounds.len())
                .unwrap_or(u32::MAX / 2)
                .saturating_mul(2),
        }
    }

    fn is_finished(&self) -> bool {
        self.phase == SilhouettePhase::Resolution
    }

    fn tick(self) -> Self {
        match self.phase {
            SilhouettePhase::Playing { time_left } if time_left <= 1 => self.skip(),
            SilhouettePhase::Playing { time_left } => Self {
                phase: SilhouettePhase::Playing {
                    time_left: time_left - 1,
                },
                ..self
            },
            SilhouettePhase::RoundResult | SilhouettePhase::Resolution => self,
        }
    }

    fn stats(&self) -> SilhouetteStats {
        let max_possible = u32::try_from(self.rounds.len())
            .unwrap_or(u32::MAX)
            .saturating_mul(self.config().max_points);
        SilhouetteStats {
            total_score: self.total_score,
            max_possible,
            percentage: percent(self.total_score as usize, max_possible as usize),
            solved: self.rounds.iter().filter(|r| r.solved).count(),
            skipped: self.rounds.iter().filter(|r| r.skipped).count(),
            total_rounds: self.rounds.len(),
            total_hints: self.rounds.iter().map(|r| r.hints_revealed.len()).sum(),
            total_wrong: self.rounds.iter().map(|r| r.guesses.len()).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(difficulty: Difficulty, region: Region, seed: u64) -> (World, SilhouetteState) {
        let world = World::embedded().unwrap();
        let state = SilhouetteState::create(&world, difficulty, region, &mut Rng::new(seed));
        (world, state)
    }

    fn answer(world: &World, state: &SilhouetteState) -> String {
        world.label(state.round().unwrap().country)
    }

    #[test]
    fn test_create_draws_distinct_full_size_rounds() {
        let (world, state) = game(Difficulty::Hard, Region::All, 4);
        assert_eq!(state.rounds.len(), 10);
        let mut codes: Vec<_> = state.rounds.iter().map(|r| r.country).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), 10);
        assert!(codes.iter().all(|c| !TINY_COUNTRIES.contains(c)));
        assert!(codes.iter().all(|c| world.catalog().contains(*c)));
        assert_eq!(state.phase, SilhouettePhase::Playing { time_left: 15 });
    }

    #[test]
    fn test_small_region_is_padded() {
        // Oceania has only a handful of famous countries
        let (world, state) = game(Difficulty::Hard, Region::Only(Continent::Oceania), 9);
        assert_eq!(state.rounds.len(), 10);
        assert!(
            state
                .rounds
                .iter()
                .any(|r| !world.catalog().in_region(r.country, state.region))
        );
    }

    #[test]
    fn test_correct_guess_scores_with_penalties() {
        let (world, state) = game(Difficulty::Easy, Region::All, 1);
        let names = world.names();
        let target = state.round().unwrap().country;
        let wrong = if target == CountryCode::from_static("FR") { "Spain" } else { "France" };

        let (state, result) = state.submit(&names, wrong);
        assert_eq!(result, Answer::Wrong);
        let (state, _) = state.submit(&names, wrong);
        assert_eq!(state.round().unwrap().guesses.len(), 1);

        let (state, hint) = state.hint();
        assert!(matches!(hint, Some(SilhouetteHint::Continent(_))));

        let input = answer(&world, &state);
        let (state, result) = state.submit(&names, &input);
        assert_eq!(result, Answer::Correct);
        assert_eq!(state.phase, SilhouettePhase::RoundResult);
        // 100 - 1 * 10 - 1 * 15
        assert_eq!(state.round().unwrap().points, 75);
        assert_eq!(state.total_score, 75);
    }

    #[test]
    fn test_points_floor() {
        let config = SilhouetteConfig::for_difficulty(Difficulty::Hard);
        assert_eq!(config.solve_points(0, 0), 100);
        assert_eq!(config.solve_points(3, 4), MIN_ROUND_POINTS);
    }

    #[test]
    fn test_hint_exhaustion_is_noop() {
        let (_, mut state) = game(Difficulty::Easy, Region::Only(Continent::Europe), 2);
        // Famous European countries all have land borders, so four hints
        let available = state.round().unwrap().hints_available.len();
        assert_eq!(available, 4);
        let order = ["continent", "first_letter", "capital", "neighbors"];
        for expected in order {
            let (next, hint) = state.hint();
            let json = serde_json::to_value(hint.unwrap()).unwrap();
            assert_eq!(json["kind"], expected);
            state = next;
        }
        let before = state.clone();
        let (after, hint) = state.hint();
        assert!(hint.is_none());
        assert_eq!(after, before);
    }

    #[test]
    fn test_timeout_skips_round_and_game_ends() {
        let (_, mut state) = game(Difficulty::Easy, Region::All, 3);
        for round in 0..5 {
            assert_eq!(state.current_round, round);
            for _ in 0..30 {
                state = state.tick();
            }
            assert_eq!(state.phase, SilhouettePhase::RoundResult);
            assert!(state.round().unwrap().skipped);
            state = state.next_round();
        }
        assert!(state.is_finished());
        let stats = state.stats();
        assert_eq!(stats.skipped, 5);
        assert_eq!(stats.total_score, 0);
        assert_eq!(stats.max_possible, 500);
        assert_eq!(stats.percentage, 0);
    }

    #[test]
    fn test_invalid_input_changes_nothing() {
        let (world, state) = game(Difficulty::Medium, Region::All, 5);
        let names = world.names();
        let (after, result) = state.clone().submit(&names, "Atlantis");
        assert_eq!(result, Answer::Invalid);
        assert_eq!(after, state);
    }

    #[test]
    fn test_first_letter_hint_is_uppercase() {
        let world = World::from_json(
            r#"[
              {"code": "SZ", "name": "eswatini", "capital": "Mbabane", "continent": "Africa", "centroid": [-26.5, 31.5]},
              {"code": "ZA", "name": "South Africa", "capital": "Pretoria", "continent": "Africa", "centroid": [-30.6, 22.9]}
            ]"#,
            r#"{"SZ": ["ZA"], "ZA": ["SZ"]}"#,
            "{}",
        )
        .unwrap();
        let round = SilhouetteRound::new(&world, CountryCode::from_static("SZ"));
        assert_eq!(round.hints_available[1], SilhouetteHint::FirstLetter('E'));
    }
}
