//! Capital clash: match countries and capitals against the clock.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::game::common::{
    build_queue, candidate_pool, Answer, Difficulty, SprintConfig, StreakRules, MIN_QUEUE_LEN,
};
use crate::game::session::GameKind;
use crate::game::sprint::{Sprint, SprintGame};
use crate::rng::Rng;
use crate::world::{CountryCode, NameResolver, Region, World};

/// Which half of the pair is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Show the country, ask for its capital.
    CountryToCapital,
    /// Show the capital, ask for its country.
    CapitalToCountry,
}

/// One queued question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapitalQuestion {
    /// The country the question is about.
    pub country: CountryCode,
    /// What is shown and what is asked.
    pub direction: Direction,
}

impl CapitalQuestion {
    /// Whether `input` answers this question.
    #[must_use]
    pub fn accepts(&self, names: &dyn NameResolver, input: &str) -> bool {
        match self.direction {
            Direction::CountryToCapital => names.capital_matches(self.country, input),
            Direction::CapitalToCountry => names.country_matches(self.country, input),
        }
    }

    /// Prompt and expected answer in the resolver's locale.
    #[must_use]
    pub fn display<'n>(&self, names: &'n dyn NameResolver) -> (&'n str, &'n str) {
        let country = names.country_name(self.country).unwrap_or_default();
        let capital = names.capital_name(self.country).unwrap_or_default();
        match self.direction {
            Direction::CountryToCapital => (country, capital),
            Direction::CapitalToCountry => (capital, country),
        }
    }
}

/// Marker for capital clash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capitals;

impl Capitals {
    /// Whether `difficulty` mixes both question directions.
    #[must_use]
    pub const fn mixes_directions(difficulty: Difficulty) -> bool {
        !matches!(difficulty, Difficulty::Easy)
    }
}

impl SprintGame for Capitals {
    type Question = CapitalQuestion;
    type Response = String;

    const KIND: GameKind = GameKind::Capitals;

    fn config(difficulty: Difficulty) -> SprintConfig {
        let (total_time, step, max_multiplier, wrong_penalty) = match difficulty {
            Difficulty::Easy => (60, 3, 3, 0),
            Difficulty::Medium => (60, 3, 4, 5),
            Difficulty::Hard => (45, 5, 5, 10),
        };
        SprintConfig {
            total_time,
            rules: StreakRules {
                base_points: 10,
                step,
                max_multiplier,
            },
            wrong_penalty,
            skip_penalty: 0,
        }
    }
}

/// Capital clash session state.
pub type CapitalClashState = Sprint<Capitals>;

impl Sprint<Capitals> {
    /// Queue questions from `region` up to the difficulty's tier.
    ///
    /// Easy always shows the capital; harder levels pick a direction per
    /// question at random.
    #[must_use]
    pub fn create(world: &World, difficulty: Difficulty, region: Region, rng: &mut Rng) -> Self {
        let pool = candidate_pool(world.catalog(), region, difficulty.max_tier(), |_| true);
        let mix = Capitals::mixes_directions(difficulty);
        let queue = build_queue(&pool, rng, MIN_QUEUE_LEN)
            .into_iter()
            .map(|country| CapitalQuestion {
                country,
                direction: if mix && rng.chance(0.5) {
                    Direction::CountryToCapital
                } else {
                    Direction::CapitalToCountry
                },
            })
            .collect();
        Self::new(difficulty, region, queue)
    }

    /// Judge a typed answer to the current question.
    ///
    /// Any input while playing is either right or wrong and moves on.
    #[must_use]
    pub fn submit(self, names: &dyn NameResolver, input: &str) -> (Self, Answer) {
        if !self.phase.is_playing() {
            return (self, Answer::Invalid);
        }
        let Some(question) = self.current().copied() else {
            return (self, Answer::Invalid);
        };
        let answer = input.trim().to_string();
        let correct = question.accepts(names, input);
        trace!(country = %question.country, ?question.direction, correct, "capital guess");
        if correct {
            (self.credit(answer), Answer::Correct)
        } else {
            (self.penalize(answer, true), Answer::Wrong)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::session::Session;

    fn with_question(direction: Direction, code: &'static str) -> CapitalClashState {
        let queue = vec![
            CapitalQuestion {
                country: CountryCode::from_static(code),
                direction,
            };
            3
        ];
        Sprint::new(Difficulty::Medium, Region::All, queue).start_playing()
    }

    #[test]
    fn test_easy_asks_for_countries_only() {
        let world = World::embedded().unwrap();
        let state = CapitalClashState::create(&world, Difficulty::Easy, Region::All, &mut Rng::new(2));
        assert!(state.queue.len() >= MIN_QUEUE_LEN);
        assert!(state.queue.iter().all(|q| q.direction == Direction::CapitalToCountry));
    }

    #[test]
    fn test_medium_mixes_directions() {
        let world = World::embedded().unwrap();
        let state =
            CapitalClashState::create(&world, Difficulty::Medium, Region::All, &mut Rng::new(2));
        let to_capital = state
            .queue
            .iter()
            .filter(|q| q.direction == Direction::CountryToCapital)
            .count();
        assert!(to_capital > 0 && to_capital < state.queue.len());
    }

    #[test]
    fn test_partial_capital_match() {
        let world = World::embedded().unwrap();
        let names = world.names();
        let state = with_question(Direction::CountryToCapital, "US");
        let (state, result) = state.submit(&names, "Washington");
        assert_eq!(result, Answer::Correct);
        assert_eq!(state.score, 10);
        assert_eq!(state.attempts[0].response.as_deref(), Some("Washington"));

        let (_, result) = state.submit(&names, "Wash");
        assert_eq!(result, Answer::Correct);
    }

    #[test]
    fn test_short_fragment_is_wrong() {
        let world = World::embedded().unwrap();
        let names = world.names();
        let (state, result) = with_question(Direction::CountryToCapital, "US").submit(&names, "Was");
        assert_eq!(result, Answer::Wrong);
        assert_eq!(state.current_index, 1);
    }

    #[test]
    fn test_country_direction_accepts_name_or_code() {
        let world = World::embedded().unwrap();
        let names = world.names();
        let state = with_question(Direction::CapitalToCountry, "DE");
        let (state, result) = state.submit(&names, "germany");
        assert_eq!(result, Answer::Correct);
        let (state, result) = state.submit(&names, "de");
        assert_eq!(result, Answer::Correct);
        let (_, result) = state.submit(&names, "Berlin");
        assert_eq!(result, Answer::Wrong);
    }

    #[test]
    fn test_skip_is_free() {
        let state = with_question(Direction::CapitalToCountry, "DE").skip();
        assert_eq!(state.score, 0);
        assert_eq!(state.current_index, 1);
        assert_eq!(state.attempts[0].response, None);
        assert_eq!(state.stats().skipped, 1);
    }

    #[test]
    fn test_display_follows_direction() {
        let world = World::embedded().unwrap();
        let names = world.names();
        let question = CapitalQuestion {
            country: CountryCode::from_static("DE"),
            direction: Direction::CapitalToCountry,
        };
        assert_eq!(question.display(&names), ("Berlin", "Germany"));
    }
}
