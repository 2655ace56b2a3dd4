//! Scripted players for the simulator.
//!
//! A bot answers correctly with a fixed probability and otherwise types a
//! plausible wrong country. It acts at most once per simulated second.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::game::{
    BorderBlitzState, CapitalClashState, CapitalQuestion, FlagSprintState, MapQuizState,
    RoutePhase, RouteState, SilhouettePhase, SilhouetteState,
};
use crate::rng::Rng;
use crate::world::{CountryCode, NameResolver, Names, World};

/// Fallback text for a guess that matches nothing useful.
const NONSENSE: &str = "Atlantis";

/// Behaviour knobs for a scripted player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BotProfile {
    /// Probability that an answer is correct.
    pub accuracy: f64,
    /// Probability of asking for a hint instead of answering.
    pub hint_rate: f64,
    /// Probability of skipping whenever a skip is available.
    pub skip_rate: f64,
}

impl Default for BotProfile {
    fn default() -> Self {
        Self {
            accuracy: 0.8,
            hint_rate: 0.05,
            skip_rate: 0.1,
        }
    }
}

/// A scripted player bound to one world.
#[derive(Debug, Clone)]
pub struct Bot<'w> {
    world: &'w World,
    names: Names<'w>,
    codes: Vec<CountryCode>,
    profile: BotProfile,
    rng: Rng,
}

impl<'w> Bot<'w> {
    /// Create a bot that draws its choices from `rng`.
    #[must_use]
    pub fn new(world: &'w World, profile: BotProfile, rng: Rng) -> Self {
        Self {
            world,
            names: world.names(),
            codes: world.catalog().iter().map(|c| c.code).collect(),
            profile,
            rng,
        }
    }

    fn accurate(&mut self) -> bool {
        self.rng.chance(self.profile.accuracy)
    }

    fn wants_hint(&mut self) -> bool {
        self.rng.chance(self.profile.hint_rate)
    }

    fn wants_skip(&mut self) -> bool {
        self.rng.chance(self.profile.skip_rate)
    }

    /// A random country for which `avoid` is false.
    fn other_country(&mut self, avoid: impl Fn(CountryCode) -> bool) -> Option<CountryCode> {
        (0..16)
            .filter_map(|_| self.rng.choose(&self.codes).copied())
            .find(|&c| !avoid(c))
    }

    fn name_of(&self, code: CountryCode) -> String {
        self.names
            .country_name(code)
            .map_or_else(|| code.to_string(), str::to_string)
    }

    fn wrong_name(&mut self, avoid: impl Fn(CountryCode) -> bool) -> String {
        self.other_country(avoid)
            .map_or_else(|| NONSENSE.to_string(), |c| self.name_of(c))
    }

    /// One route action: step along a shortest route, blunder, hint, or
    /// skip to a new route once skipping unlocks.
    #[must_use]
    pub fn play_route(&mut self, state: RouteState) -> RouteState {
        if !matches!(state.phase, RoutePhase::Execution { .. }) {
            return state;
        }
        if state.can_skip() && self.wants_skip() {
            let mut rng = self.rng.fork();
            return state.skip(self.world, &mut rng).0;
        }
        if self.wants_hint() {
            return state.hint(self.world).0;
        }
        let world = self.world;
        let graph = world.graph();
        let input = if self.accurate() {
            let visited: HashSet<CountryCode> = state.player_path.iter().copied().collect();
            let next = graph
                .shortest_path(state.current, state.end, Some(&visited))
                .and_then(|path| path.get(1).copied())
                .filter(|&c| c != state.end);
            match next {
                Some(code) => self.name_of(code),
                None => return state,
            }
        } else {
            let current = state.current;
            self.wrong_name(|c| graph.is_neighbor(current, c))
        };
        state.submit(self.world, &self.names, &input).0
    }

    /// One silhouette action: guess, hint, or move to the next round.
    #[must_use]
    pub fn play_silhouette(&mut self, state: SilhouetteState) -> SilhouetteState {
        match state.phase {
            SilhouettePhase::RoundResult => state.next_round(),
            SilhouettePhase::Resolution => state,
            SilhouettePhase::Playing { .. } => {
                let Some(target) = state.round().map(|r| r.country) else {
                    return state;
                };
                if self.wants_hint() {
                    return state.hint().0;
                }
                if self.wants_skip() {
                    return state.skip();
                }
                let input = if self.accurate() {
                    self.name_of(target)
                } else {
                    self.wrong_name(|c| c == target)
                };
                state.submit(&self.names, &input).0
            }
        }
    }

    /// One flag-sprint action.
    #[must_use]
    pub fn play_flags(&mut self, state: FlagSprintState) -> FlagSprintState {
        let Some(&target) = state.current().filter(|_| state.phase.is_playing()) else {
            return state;
        };
        if self.wants_skip() {
            return state.skip();
        }
        let input = if self.accurate() {
            self.name_of(target)
        } else {
            self.wrong_name(|c| c == target)
        };
        state.submit(&self.names, &input).0
    }

    /// One capital-clash action.
    #[must_use]
    pub fn play_capitals(&mut self, state: CapitalClashState) -> CapitalClashState {
        let Some(&question) = state.current().filter(|_| state.phase.is_playing()) else {
            return state;
        };
        if self.wants_skip() {
            return state.skip();
        }
        let input = if self.accurate() {
            question.display(&self.names).1.to_string()
        } else {
            let other = self.other_country(|c| c == question.country);
            let names = &self.names;
            other
                .map(|other| {
                    let decoy = CapitalQuestion {
                        country: other,
                        direction: question.direction,
                    };
                    decoy.display(names).1.to_string()
                })
                .filter(|text| !question.accepts(names, text))
                .unwrap_or_else(|| NONSENSE.to_string())
        };
        state.submit(&self.names, &input).0
    }

    /// One map-quiz action.
    #[must_use]
    pub fn play_map_quiz(&mut self, state: MapQuizState) -> MapQuizState {
        let Some(&target) = state.current().filter(|_| state.phase.is_playing()) else {
            return state;
        };
        if self.wants_skip() {
            return state.skip();
        }
        let clicked = if self.accurate() {
            Some(target)
        } else {
            self.other_country(|c| c == target)
        };
        match clicked {
            Some(code) => state.click(code).0,
            None => state,
        }
    }

    /// One border-blitz action.
    #[must_use]
    pub fn play_border_blitz(&mut self, state: BorderBlitzState) -> BorderBlitzState {
        if !state.phase.is_playing() {
            return state;
        }
        if state.can_skip() && self.wants_skip() {
            let mut rng = self.rng.fork();
            return state.skip(self.world, &mut rng).0;
        }
        if self.wants_hint() {
            let mut rng = self.rng.fork();
            return state.hint(&mut rng).0;
        }
        let input = if self.accurate() {
            let unfound: Vec<CountryCode> = state.unfound().collect();
            match self.rng.choose(&unfound) {
                Some(&code) => self.name_of(code),
                None => return state,
            }
        } else {
            let anchor = state.anchor;
            let world = self.world;
            let graph = world.graph();
            self.wrong_name(|c| graph.is_neighbor(anchor, c))
        };
        state.submit(&self.names, &input).0
    }
}
