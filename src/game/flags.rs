//! Flag sprint: name as many flags as possible before the clock runs out.

use tracing::trace;

use crate::game::common::{
    build_queue, candidate_pool, Answer, Difficulty, SprintConfig, StreakRules, MIN_QUEUE_LEN,
};
use crate::game::session::GameKind;
use crate::game::sprint::{Sprint, SprintGame};
use crate::rng::Rng;
use crate::world::{CountryCode, NameResolver, Region, World};

/// Marker for the flag sprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flags;

impl SprintGame for Flags {
    type Question = CountryCode;
    type Response = CountryCode;

    const KIND: GameKind = GameKind::Flags;

    fn config(difficulty: Difficulty) -> SprintConfig {
        match difficulty {
            Difficulty::Easy => SprintConfig {
                total_time: 60,
                rules: StreakRules {
                    base_points: 10,
                    step: 3,
                    max_multiplier: 3,
                },
                wrong_penalty: 0,
                skip_penalty: 0,
            },
            Difficulty::Medium => SprintConfig {
                total_time: 60,
                rules: StreakRules {
                    base_points: 10,
                    step: 3,
                    max_multiplier: 4,
                },
                wrong_penalty: 5,
                skip_penalty: 0,
            },
            Difficulty::Hard => SprintConfig {
                total_time: 45,
                rules: StreakRules {
                    base_points: 10,
                    step: 5,
                    max_multiplier: 5,
                },
                wrong_penalty: 10,
                skip_penalty: 5,
            },
        }
    }
}

/// Flag sprint session state.
pub type FlagSprintState = Sprint<Flags>;

impl Sprint<Flags> {
    /// Queue flags from `region` up to the difficulty's tier.
    #[must_use]
    pub fn create(world: &World, difficulty: Difficulty, region: Region, rng: &mut Rng) -> Self {
        let pool = candidate_pool(world.catalog(), region, difficulty.max_tier(), |_| true);
        Self::new(difficulty, region, build_queue(&pool, rng, MIN_QUEUE_LEN))
    }

    /// Judge a typed country for the flag on screen.
    ///
    /// Unresolvable input changes nothing; any resolved country is either
    /// right or wrong and moves to the next flag.
    #[must_use]
    pub fn submit(self, names: &dyn NameResolver, input: &str) -> (Self, Answer) {
        if !self.phase.is_playing() {
            return (self, Answer::Invalid);
        }
        let Some(code) = names.resolve_country(input) else {
            return (self, Answer::Invalid);
        };
        let Some(&target) = self.current() else {
            return (self, Answer::Invalid);
        };
        trace!(%code, %target, "flag guess");
        if code == target {
            (self.credit(code), Answer::Correct)
        } else {
            (self.penalize(code, true), Answer::Wrong)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::common::TimedPhase;
    use crate::game::session::Session;
    use crate::world::{Continent, Tier};

    fn game(difficulty: Difficulty, region: Region) -> (World, FlagSprintState) {
        let world = World::embedded().unwrap();
        let state = FlagSprintState::create(&world, difficulty, region, &mut Rng::new(11));
        (world, state)
    }

    fn target(state: &FlagSprintState) -> CountryCode {
        *state.current().unwrap()
    }

    #[test]
    fn test_queue_respects_region_and_tier() {
        let (world, state) = game(Difficulty::Easy, Region::Only(Continent::Europe));
        assert!(state.queue.len() >= MIN_QUEUE_LEN);
        for &code in &state.queue {
            assert!(world.catalog().in_region(code, state.region));
            assert_eq!(world.catalog().tier(code), Tier::Famous);
        }
        assert_eq!(state.phase, TimedPhase::countdown());
    }

    #[test]
    fn test_correct_and_wrong_answers() {
        let (world, state) = game(Difficulty::Medium, Region::All);
        let names = world.names();
        let state = state.start_playing();

        let first = target(&state);
        let (state, result) = state.submit(&names, &world.label(first));
        assert_eq!(result, Answer::Correct);
        assert_eq!(state.score, 10);
        assert_eq!(state.current_index, 1);

        let second = target(&state);
        let wrong = if second == CountryCode::from_static("FR") { "DE" } else { "FR" };
        let (state, result) = state.submit(&names, wrong);
        assert_eq!(result, Answer::Wrong);
        assert_eq!(state.score, 5);
        assert_eq!(state.streak.current, 0);
        assert_eq!(state.current_index, 2);
    }

    #[test]
    fn test_invalid_and_out_of_phase_input() {
        let (world, state) = game(Difficulty::Hard, Region::All);
        let names = world.names();
        let (after, result) = state.clone().submit(&names, "France");
        assert_eq!(result, Answer::Invalid);
        assert_eq!(after, state);

        let playing = state.start_playing();
        let (after, result) = playing.clone().submit(&names, "not a country");
        assert_eq!(result, Answer::Invalid);
        assert_eq!(after, playing);
    }

    #[test]
    fn test_streak_reset_scenario() {
        let (world, state) = game(Difficulty::Hard, Region::All);
        let names = world.names();
        let mut state = state.start_playing();
        for _ in 0..5 {
            let code = target(&state);
            state = state.submit(&names, code.as_str()).0;
        }
        assert_eq!(state.streak.current, 5);
        assert_eq!(state.multiplier(), 2);

        let code = target(&state);
        let wrong = if code == CountryCode::from_static("FR") { "DE" } else { "FR" };
        state = state.submit(&names, wrong).0;
        assert_eq!(state.streak.current, 0);
        assert_eq!(state.multiplier(), 1);

        let before = state.score;
        let code = target(&state);
        state = state.submit(&names, code.as_str()).0;
        assert_eq!(state.score, before + 10);
    }

    #[test]
    fn test_hard_skip_penalty() {
        let (world, state) = game(Difficulty::Hard, Region::All);
        let names = world.names();
        let state = state.start_playing();
        let code = target(&state);
        let (state, _) = state.submit(&names, code.as_str());
        let state = state.skip();
        assert_eq!(state.score, 5);
        let stats = state.stats();
        assert_eq!((stats.correct, stats.skipped, stats.total), (1, 1, 2));
        assert_eq!(stats.accuracy, 50);
        assert_eq!(stats.best_streak, 1);
    }
}
