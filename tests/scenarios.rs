//! End-to-end scenarios played through the public engine API.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use geodash::game::{
    check_step, Answer, BlitzResult, BorderBlitzState, CapitalClashState, CapitalQuestion,
    Difficulty, Direction, Invariants, MoveResult, Rating, RouteEnding, RoutePhase, RouteState,
    SilhouettePhase, SilhouetteState, SkipResult, TimedPhase,
};
use geodash::{CountryCode, Continent, GameKind, NameResolver, Region, Rng, Session, World};

fn code(s: &'static str) -> CountryCode {
    CountryCode::from_static(s)
}

fn europe() -> Region {
    Region::Only(Continent::Europe)
}

#[test]
fn route_connect_win_from_portugal_to_greece() {
    let world = World::embedded().unwrap();
    let names = world.names();
    let state = RouteState::with_endpoints(&world, Difficulty::Medium, europe(), code("PT"), code("GR"));
    assert!(matches!(state.phase, RoutePhase::Reveal { .. }));
    assert_eq!(state.optimal_path.len(), 9);
    assert_eq!(state.optimal_moves(), 7);

    let mut state = state.start_execution();

    // One blunder and one hint along the way
    let (next, result) = state.submit(&world, &names, "Japan");
    assert_eq!(result, MoveResult::NotNeighbor);
    state = next;
    let (next, hint) = state.hint(&world);
    assert_eq!(hint, Some(code("ES")));
    state = next;

    let path = state.optimal_path.clone();
    for &step in &path[1..path.len() - 1] {
        let name = names.country_name(step).unwrap().to_string();
        let (next, result) = state.submit(&world, &names, &name);
        assert_eq!(result, MoveResult::Correct, "{step}");
        state = next;
    }

    assert!(state.is_complete());
    assert_eq!(
        state.phase,
        RoutePhase::Resolution {
            ending: RouteEnding::Completed
        }
    );
    assert_eq!(state.score, 7 + 3 + 2);

    let stats = state.stats();
    assert!(stats.completed);
    assert_eq!(stats.breakdown.total, 12);
    assert_eq!(stats.breakdown.optimal_moves, 7);
    assert_eq!(stats.rating, Rating::of(12, 7));

    // Nothing changes once resolved
    let (after, result) = state.clone().submit(&world, &names, "Bulgaria");
    assert_eq!(result, MoveResult::InvalidCountry);
    assert_eq!(after, state);
}

#[test]
fn route_naming_the_destination_is_rejected() {
    let world = World::embedded().unwrap();
    let names = world.names();
    let state = RouteState::with_endpoints(&world, Difficulty::Easy, Region::All, code("ES"), code("PL"))
        .start_execution();
    let (state, result) = state.submit(&world, &names, "pl");
    assert_eq!(result, MoveResult::DestinationCountry);
    assert_eq!(state.wrong_attempts, 1);
    let (state, result) = state.submit(&world, &names, "Espana");
    assert_eq!(result, MoveResult::InvalidCountry);
    let (state, result) = state.submit(&world, &names, "Spain");
    assert_eq!(result, MoveResult::AlreadyVisited);
    assert_eq!(state.score, 6);
}

#[test]
fn route_skip_unlocks_after_two_misses() {
    let world = World::embedded().unwrap();
    let names = world.names();
    let mut rng = Rng::new(8);
    let state = RouteState::with_endpoints(&world, Difficulty::Medium, Region::All, code("ES"), code("PL"))
        .start_execution();
    let (state, result) = state.skip(&world, &mut rng);
    assert_eq!(result, SkipResult::Locked);

    let (state, _) = state.submit(&world, &names, "Japan");
    let (state, _) = state.submit(&world, &names, "Brazil");
    assert!(state.can_skip());
    let before = state.clone();
    let (fresh, result) = state.skip(&world, &mut rng);
    assert_eq!(result, SkipResult::Skipped);
    assert!(check_step(&before, &fresh).is_empty());
    assert!(fresh.check_invariants(&world).is_empty());
    assert!(matches!(fresh.phase, RoutePhase::Execution { .. }));
    assert_eq!(fresh.progress(), before.progress());
    assert_eq!(fresh.wrong_attempts, 2);
    assert_eq!(fresh.consecutive_wrong, 0);
    assert_eq!(fresh.skips_used, 1);
    assert_eq!(fresh.score, 6);
}

#[test]
fn route_clock_runs_out() {
    let world = World::embedded().unwrap();
    let mut state = RouteState::with_endpoints(&world, Difficulty::Hard, Region::All, code("PT"), code("CN"));
    while !state.is_finished() {
        state = state.tick();
    }
    assert!(state.is_timeout());
    assert!(state.stats().timed_out);
    assert!(state.score >= 5);
}

#[test]
fn border_blitz_completion_for_germany() {
    let world = World::embedded().unwrap();
    let names = world.names();
    let mut state =
        BorderBlitzState::with_anchor(&world, Difficulty::Hard, Region::All, code("DE")).start_playing();
    assert_eq!(state.neighbors.len(), 9);

    for neighbour in ["DK", "PL", "CZ", "AT", "CH", "FR", "LU", "BE", "NL"] {
        let (next, result) = state.submit(&names, neighbour);
        assert_eq!(result, BlitzResult::Correct);
        state = next;
    }

    assert_eq!(state.found.len(), 9);
    assert_eq!(state.phase, TimedPhase::Resolution);
    assert_eq!(state.wrong_attempts, 0);
    let stats = state.stats();
    assert!(stats.all_found);
    assert_eq!(stats.score, 90);
    assert_eq!(stats.accuracy, 100);
}

#[test]
fn border_blitz_oceania_always_finds_an_anchor() {
    let world = World::embedded().unwrap();
    for seed in 0..20 {
        let state = BorderBlitzState::create(
            &world,
            Difficulty::Hard,
            Region::Only(Continent::Oceania),
            &mut Rng::new(seed),
        );
        assert!(!state.neighbors.is_empty());
        assert_eq!(state.neighbors, world.graph().neighbors(state.anchor));
    }
}

#[test]
fn capital_clash_partial_match_and_streak_reset() {
    let world = World::embedded().unwrap();
    let names = world.names();
    let mut state =
        CapitalClashState::create(&world, Difficulty::Medium, Region::All, &mut Rng::new(4))
            .start_playing();
    assert_eq!(state.kind(), GameKind::Capitals);

    for _ in 0..5 {
        let answer = state.current().unwrap().display(&names).1.to_string();
        let (next, result) = state.submit(&names, &answer);
        assert_eq!(result, Answer::Correct);
        state = next;
    }
    assert_eq!(state.streak.current, 5);
    assert!(state.multiplier() > 1);

    let (next, result) = state.submit(&names, "Atlantis");
    assert_eq!(result, Answer::Wrong);
    state = next;
    assert_eq!(state.streak.current, 0);
    assert_eq!(state.multiplier(), 1);

    let washington = CapitalQuestion {
        country: code("US"),
        direction: Direction::CountryToCapital,
    };
    assert!(washington.accepts(&names, "Washington"));
    assert!(washington.accepts(&names, "washington, d.c."));
    assert!(!washington.accepts(&names, "Was"));
}

#[test]
fn silhouette_hint_exhaustion() {
    let world = World::embedded().unwrap();
    let state = SilhouetteState::create(&world, Difficulty::Medium, europe(), &mut Rng::new(6));
    let round = state.round().unwrap().clone();
    let expected = if world.graph().has_land_borders(round.country) { 4 } else { 3 };
    assert_eq!(round.hints_available.len(), expected);

    let mut state = state;
    for _ in 0..expected {
        let (next, hint) = state.hint();
        assert!(hint.is_some());
        state = next;
    }
    let (after, hint) = state.clone().hint();
    assert_eq!(hint, None);
    assert_eq!(after, state);
    assert_eq!(after.round().unwrap().hints_revealed.len(), expected);
}

#[test]
fn silhouette_full_game_with_timeouts() {
    let world = World::embedded().unwrap();
    let names = world.names();
    let mut state = SilhouetteState::create(&world, Difficulty::Easy, Region::All, &mut Rng::new(2));
    let rounds = state.rounds.len();

    // Solve the first round, let the clock take the second, skip the rest
    let target = state.round().unwrap().country;
    let (next, result) = state.submit(&names, target.as_str());
    assert_eq!(result, Answer::Correct);
    state = next.next_round();

    while matches!(state.phase, SilhouettePhase::Playing { .. }) {
        state = state.tick();
    }
    assert!(state.rounds[1].skipped);
    state = state.next_round();

    while !state.is_finished() {
        state = state.skip().next_round();
    }

    let stats = state.stats();
    assert_eq!(stats.total_rounds, rounds);
    assert_eq!(stats.solved, 1);
    assert_eq!(stats.skipped, rounds - 1);
    assert_eq!(stats.total_score, state.rounds[0].points);
    assert_eq!(state.progress(), rounds);
}
