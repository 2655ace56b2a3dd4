//! Map quiz: click the named country on the map.
//!
//! A wrong click costs points and the streak but keeps the same target.

use tracing::trace;

use crate::game::common::{
    build_queue, candidate_pool, Answer, Difficulty, SprintConfig, StreakRules, MIN_QUEUE_LEN,
};
use crate::game::session::GameKind;
use crate::game::sprint::{Sprint, SprintGame};
use crate::rng::Rng;
use crate::world::{CountryCode, Region, World};

/// Marker for the map quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapQuiz;

impl SprintGame for MapQuiz {
    type Question = CountryCode;
    type Response = CountryCode;

    const KIND: GameKind = GameKind::MapQuiz;

    fn config(difficulty: Difficulty) -> SprintConfig {
        let (total_time, step, max_multiplier, wrong_penalty, skip_penalty) = match difficulty {
            Difficulty::Easy => (60, 3, 3, 0, 0),
            Difficulty::Medium => (60, 3, 4, 5, 0),
            Difficulty::Hard => (45, 5, 5, 10, 5),
        };
        SprintConfig {
            total_time,
            rules: StreakRules {
                base_points: 10,
                step,
                max_multiplier,
            },
            wrong_penalty,
            skip_penalty,
        }
    }
}

/// Map quiz session state.
pub type MapQuizState = Sprint<MapQuiz>;

impl Sprint<MapQuiz> {
    /// Queue targets from `region` up to the difficulty's tier.
    #[must_use]
    pub fn create(world: &World, difficulty: Difficulty, region: Region, rng: &mut Rng) -> Self {
        let pool = candidate_pool(world.catalog(), region, difficulty.max_tier(), |_| true);
        Self::new(difficulty, region, build_queue(&pool, rng, MIN_QUEUE_LEN))
    }

    /// Judge a click on `clicked`.
    #[must_use]
    pub fn click(self, clicked: CountryCode) -> (Self, Answer) {
        if !self.phase.is_playing() {
            return (self, Answer::Invalid);
        }
        let Some(&target) = self.current() else {
            return (self, Answer::Invalid);
        };
        trace!(%clicked, %target, "map click");
        if clicked == target {
            (self.credit(clicked), Answer::Correct)
        } else {
            (self.penalize(clicked, false), Answer::Wrong)
        }
    }
}
