#![no_main]

//! Session engine fuzzer.
//!
//! Drives a game of the chosen kind with arbitrary input text and control
//! actions, checking per-step and whole-state invariants after every call.

use std::sync::OnceLock;

use arbitrary::Arbitrary;
use geodash::game::{
    check_step, BorderBlitzState, CapitalClashState, Invariants, RouteState, SilhouetteState,
};
use geodash::{Difficulty, Region, Rng, Session, World};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum Op {
    Tick,
    Submit(String),
    Hint,
    Skip,
    Advance,
}

#[derive(Arbitrary, Debug)]
enum Game {
    Route,
    Silhouette,
    Capitals,
    BorderBlitz,
}

#[derive(Arbitrary, Debug)]
struct SessionInput {
    game: Game,
    difficulty: u8,
    seed: u64,
    ops: Vec<Op>,
}

fn world() -> &'static World {
    static WORLD: OnceLock<World> = OnceLock::new();
    WORLD.get_or_init(|| World::embedded().expect("embedded dataset"))
}

fn drive<S, F>(mut state: S, ops: &[Op], mut apply: F)
where
    S: Session + Invariants,
    F: FnMut(S, &Op) -> S,
{
    for op in ops.iter().take(200) {
        let before = state.clone();
        state = match op {
            Op::Tick => state.tick(),
            other => apply(state, other),
        };
        let step = check_step(&before, &state);
        assert!(step.is_empty(), "{step:?}");
        let violations = state.check_invariants(world());
        assert!(violations.is_empty(), "{violations:?}");
    }
}

fuzz_target!(|input: SessionInput| {
    let world = world();
    let names = world.names();
    let difficulty = Difficulty::ALL[usize::from(input.difficulty) % Difficulty::ALL.len()];
    let mut rng = Rng::new(input.seed);

    match input.game {
        Game::Route => {
            let state = RouteState::create(world, difficulty, Region::All, &mut rng);
            drive(state, &input.ops, |s, op| match op {
                Op::Submit(text) => s.submit(world, &names, text).0,
                Op::Hint => s.hint(world).0,
                Op::Skip => s.skip(world, &mut rng).0,
                Op::Advance => s.start_execution(),
                Op::Tick => s,
            });
        }
        Game::Silhouette => {
            let state = SilhouetteState::create(world, difficulty, Region::All, &mut rng);
            drive(state, &input.ops, |s, op| match op {
                Op::Submit(text) => s.submit(&names, text).0,
                Op::Hint => s.hint().0,
                Op::Skip => s.skip(),
                Op::Advance => s.next_round(),
                Op::Tick => s,
            });
        }
        Game::Capitals => {
            let state = CapitalClashState::create(world, difficulty, Region::All, &mut rng);
            drive(state, &input.ops, |s, op| match op {
                Op::Submit(text) => s.submit(&names, text).0,
                Op::Skip => s.skip(),
                Op::Advance => s.start_playing(),
                Op::Hint | Op::Tick => s,
            });
        }
        Game::BorderBlitz => {
            let state = BorderBlitzState::create(world, difficulty, Region::All, &mut rng);
            drive(state, &input.ops, |s, op| match op {
                Op::Submit(text) => s.submit(&names, text).0,
                Op::Hint => s.hint(&mut rng).0,
                Op::Skip => s.skip(world, &mut rng).0,
                Op::Advance => s.start_playing(),
                Op::Tick => s,
            });
        }
    }
});
