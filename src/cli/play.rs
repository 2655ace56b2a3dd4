//! Interactive play command implementation.
//!
//! Line-based: every line is an answer or a `:command`. Wall-clock seconds
//! elapsed between lines become `tick()` calls before the line is judged.

use super::output::{flag_emoji, pretty};
use super::{CliError, DataArgs};
use geodash::game::{
    assert_invariants, check_step, Answer, BlitzResult, BorderBlitzState, CapitalClashState,
    Direction, FlagSprintState, Invariants, MapQuizState, MoveResult, RoutePhase, RouteState,
    SilhouetteHint, SilhouettePhase, SilhouetteState, SkipResult, Sprint,
};
use geodash::{
    CountryCode, Difficulty, GameKind, NameResolver, Names, Region, Rng, Session, World,
};
use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

/// Seed derived from the system clock.
// Truncating nanoseconds keeps the fast-changing low bits
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(42)
}

/// Execute the play command.
///
/// # Errors
///
/// Returns an error if the dataset fails to load or the terminal fails.
pub(crate) fn execute(
    data: &DataArgs,
    game: GameKind,
    difficulty: Difficulty,
    region: Region,
    seed: Option<u64>,
) -> Result<(), CliError> {
    let world = data.world()?;
    let locale = data.locale()?;
    let names = match &locale {
        Some(locale) => Names::with_locale(world.catalog(), locale),
        None => world.names(),
    };
    let seed = seed.unwrap_or_else(clock_seed);
    info!(%game, %difficulty, %region, seed, "starting game");

    let mut table = Table {
        world: &world,
        names: &names,
        rng: Rng::new(seed),
    };

    match game {
        GameKind::Route => run::<RouteState>(&mut table, difficulty, region),
        GameKind::Silhouette => run::<SilhouetteState>(&mut table, difficulty, region),
        GameKind::Flags => run::<FlagSprintState>(&mut table, difficulty, region),
        GameKind::Capitals => run::<CapitalClashState>(&mut table, difficulty, region),
        GameKind::MapQuiz => run::<MapQuizState>(&mut table, difficulty, region),
        GameKind::BorderBlitz => run::<BorderBlitzState>(&mut table, difficulty, region),
    }
}

/// Everything a game needs besides its own state.
struct Table<'a> {
    world: &'a World,
    names: &'a Names<'a>,
    rng: Rng,
}

impl Table<'_> {
    fn label(&self, code: CountryCode) -> String {
        self.names
            .country_name(code)
            .map_or_else(|| code.to_string(), str::to_string)
    }
}

/// A session the terminal driver knows how to present.
trait Interactive: Session + Invariants {
    fn create(table: &mut Table<'_>, difficulty: Difficulty, region: Region) -> Self;

    fn intro(&self, table: &Table<'_>) -> String;

    /// Leave any countdown or reveal phase.
    #[must_use]
    fn begin(self) -> Self;

    fn prompt(&self, table: &Table<'_>) -> String;

    fn answer(self, table: &mut Table<'_>, input: &str) -> (Self, String);

    fn hint(self, _table: &mut Table<'_>) -> (Self, String) {
        (self, "No hints in this game".to_string())
    }

    fn skip(self, table: &mut Table<'_>) -> (Self, String);

    /// Resolve anything the clock decided without the player.
    fn settle(self, _table: &Table<'_>) -> (Self, Option<String>) {
        (self, None)
    }
}

fn elapse<S: Session>(mut state: S, seconds: u64) -> S {
    for _ in 0..seconds {
        if state.is_finished() {
            break;
        }
        state = state.tick();
    }
    state
}

fn run<S: Interactive>(
    table: &mut Table<'_>,
    difficulty: Difficulty,
    region: Region,
) -> Result<(), CliError> {
    let mut state = S::create(table, difficulty, region);
    println!("{}", state.intro(table));
    println!("Commands: :hint  :skip  :quit");
    print!("Press Enter to start...");
    io::stdout().flush()?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    if lines.next().transpose()?.is_none() {
        return Ok(());
    }

    state = state.begin();
    let mut last = Instant::now();

    while !state.is_finished() {
        print!("{} > ", state.prompt(table));
        io::stdout().flush()?;
        let Some(line) = lines.next().transpose()? else {
            break;
        };

        let seconds = last.elapsed().as_secs();
        last += Duration::from_secs(seconds);
        state = elapse(state, seconds);
        let (settled, note) = state.settle(table);
        state = settled;
        if let Some(note) = note {
            println!("{note}");
        }
        if state.is_finished() {
            println!("Time is up!");
            break;
        }

        let before = state.clone();
        let (next, message) = match line.trim() {
            ":quit" | ":q" => break,
            ":hint" | ":h" => state.hint(table),
            ":skip" | ":s" => state.skip(table),
            "" => (state, String::new()),
            input => state.answer(table, input),
        };
        for violation in check_step(&before, &next) {
            warn!(%violation, "step check failed");
        }
        assert_invariants(&next, table.world);

        let (next, note) = next.settle(table);
        state = next;
        if !message.is_empty() {
            println!("{message}");
        }
        if let Some(note) = note {
            println!("{note}");
        }
    }

    println!();
    println!("Final score: {}", state.score());
    println!("{}", pretty(&state.stats()));
    Ok(())
}

impl Interactive for RouteState {
    fn create(table: &mut Table<'_>, difficulty: Difficulty, region: Region) -> Self {
        RouteState::create(table.world, difficulty, region, &mut table.rng)
    }

    fn intro(&self, table: &Table<'_>) -> String {
        let config = self.config();
        format!(
            "Route: travel overland from {} to {}.\n\
             Name one bordering country at a time; stop next to the destination.\n\
             Shortest route needs {} countries. {}s total, {}s per move. Lower score wins.",
            table.label(self.start),
            table.label(self.end),
            self.optimal_moves(),
            config.execution_time,
            config.move_time
        )
    }

    fn begin(self) -> Self {
        self.start_execution()
    }

    fn prompt(&self, table: &Table<'_>) -> String {
        let clock = match self.phase {
            RoutePhase::Execution {
                time_left,
                move_time_left,
            } => format!("[{time_left}s | move {move_time_left}s]"),
            RoutePhase::Reveal { .. } | RoutePhase::Resolution { .. } => String::new(),
        };
        format!(
            "{clock} score {} | at {} -> {}",
            self.score,
            table.label(self.current),
            table.label(self.end)
        )
    }

    fn answer(self, table: &mut Table<'_>, input: &str) -> (Self, String) {
        let from = self.current;
        let (next, result) = self.submit(table.world, table.names, input);
        let named = next.moves.last().map(|m| m.code);
        let message = match (result, named) {
            (MoveResult::Correct, Some(code)) if next.is_finished() => format!(
                "✓ {} borders {}. Route complete!",
                table.label(code),
                table.label(next.end)
            ),
            (MoveResult::Correct, Some(code)) => format!("✓ {}", table.label(code)),
            (MoveResult::AlreadyVisited, _) => "✗ Already on your path".to_string(),
            (MoveResult::NotNeighbor, Some(code)) => format!(
                "✗ {} does not border {}",
                table.label(code),
                table.label(from)
            ),
            (MoveResult::DestinationCountry, _) => {
                "✗ That is the destination: finish beside it".to_string()
            }
            _ => "Unknown country".to_string(),
        };
        (next, message)
    }

    fn hint(self, table: &mut Table<'_>) -> (Self, String) {
        match RouteState::hint(self, table.world) {
            (next, Some(code)) => (next, format!("Hint: try {}", table.label(code))),
            (next, None) => (next, "No hint available".to_string()),
        }
    }

    fn skip(self, table: &mut Table<'_>) -> (Self, String) {
        match RouteState::skip(self, table.world, &mut table.rng) {
            (next, SkipResult::Skipped) => {
                let message = format!("New route!\n{}", next.intro(table));
                (next, message)
            }
            (next, SkipResult::Locked) => (
                next,
                "Skip unlocks after two wrong moves in a row".to_string(),
            ),
        }
    }
}

fn describe_hint(hint: &SilhouetteHint, table: &Table<'_>) -> String {
    match hint {
        SilhouetteHint::Continent(continent) => format!("continent {continent}"),
        SilhouetteHint::FirstLetter(letter) => format!("starts with {letter}"),
        SilhouetteHint::Capital(code) => format!(
            "capital {}",
            table.names.capital_name(*code).unwrap_or("?")
        ),
        SilhouetteHint::Neighbors(codes) => format!(
            "borders {}",
            codes
                .iter()
                .map(|&c| table.label(c))
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

impl Interactive for SilhouetteState {
    fn create(table: &mut Table<'_>, difficulty: Difficulty, region: Region) -> Self {
        SilhouetteState::create(table.world, difficulty, region, &mut table.rng)
    }

    fn intro(&self, _table: &Table<'_>) -> String {
        let config = self.config();
        format!(
            "Silhouette: identify {} countries from their outline.\n\
             {}s per round, up to {} points each; hints cost {} and wrong guesses {}.",
            self.rounds.len(),
            config.round_time,
            config.max_points,
            config.hint_penalty,
            config.guess_penalty
        )
    }

    fn begin(self) -> Self {
        self
    }

    fn prompt(&self, table: &Table<'_>) -> String {
        let Some(round) = self.round() else {
            return String::new();
        };
        let clock = match self.phase {
            SilhouettePhase::Playing { time_left } => format!("[{time_left}s] "),
            SilhouettePhase::RoundResult | SilhouettePhase::Resolution => String::new(),
        };
        let (lat, lon) = table
            .world
            .catalog()
            .get(round.country)
            .map_or((0.0, 0.0), |c| c.centroid);
        let hints: Vec<String> = round
            .hints_revealed
            .iter()
            .map(|h| describe_hint(h, table))
            .collect();
        let mut line = format!(
            "{clock}Round {}/{} | outline centred near {lat:.1}, {lon:.1}",
            self.current_round + 1,
            self.rounds.len()
        );
        if !hints.is_empty() {
            line.push_str(&format!(" | {}", hints.join("; ")));
        }
        line
    }

    fn answer(self, table: &mut Table<'_>, input: &str) -> (Self, String) {
        let (next, result) = self.submit(table.names, input);
        let message = match result {
            Answer::Correct => String::new(),
            Answer::Wrong => format!("✗ Not {}", input.trim()),
            Answer::Invalid => "Unknown country".to_string(),
        };
        (next, message)
    }

    fn hint(self, table: &mut Table<'_>) -> (Self, String) {
        match SilhouetteState::hint(self) {
            (next, Some(hint)) => {
                let text = describe_hint(&hint, table);
                (next, format!("Hint: {text}"))
            }
            (next, None) => (next, "No more hints".to_string()),
        }
    }

    fn skip(self, _table: &mut Table<'_>) -> (Self, String) {
        (SilhouetteState::skip(self), String::new())
    }

    fn settle(self, table: &Table<'_>) -> (Self, Option<String>) {
        if self.phase != SilhouettePhase::RoundResult {
            return (self, None);
        }
        let note = self.round().map(|round| {
            if round.solved {
                format!("✓ {} (+{})", table.label(round.country), round.points)
            } else {
                format!("It was {}", table.label(round.country))
            }
        });
        (self.next_round(), note)
    }
}

fn sprint_clock(time_left: u32, multiplier: u32, score: u32) -> String {
    format!("[{time_left}s x{multiplier}] score {score}")
}

impl Interactive for FlagSprintState {
    fn create(table: &mut Table<'_>, difficulty: Difficulty, region: Region) -> Self {
        FlagSprintState::create(table.world, difficulty, region, &mut table.rng)
    }

    fn intro(&self, _table: &Table<'_>) -> String {
        format!(
            "Flag sprint: name as many flags as you can in {}s. Streaks multiply points.",
            self.total_duration()
        )
    }

    fn begin(self) -> Self {
        self.start_playing()
    }

    fn prompt(&self, _table: &Table<'_>) -> String {
        let flag = self.current().map(|&c| flag_emoji(c)).unwrap_or_default();
        format!(
            "{} | flag {flag}",
            sprint_clock(self.time_left(), self.multiplier(), self.score)
        )
    }

    fn answer(self, table: &mut Table<'_>, input: &str) -> (Self, String) {
        let target = self.current().copied();
        let before = self.score;
        let (next, result) = self.submit(table.names, input);
        let message = match (result, target) {
            (Answer::Correct, _) => format!("✓ +{}", next.score.saturating_sub(before)),
            (Answer::Wrong, Some(code)) => format!("✗ It was {}", table.label(code)),
            _ => "Unknown country".to_string(),
        };
        (next, message)
    }

    fn skip(self, table: &mut Table<'_>) -> (Self, String) {
        let target = self.current().copied();
        let message = target.map_or_else(String::new, |c| format!("Skipped: {}", table.label(c)));
        (Sprint::skip(self), message)
    }
}

impl Interactive for CapitalClashState {
    fn create(table: &mut Table<'_>, difficulty: Difficulty, region: Region) -> Self {
        CapitalClashState::create(table.world, difficulty, region, &mut table.rng)
    }

    fn intro(&self, _table: &Table<'_>) -> String {
        format!(
            "Capital clash: match capitals and countries for {}s. Streaks multiply points.",
            self.total_duration()
        )
    }

    fn begin(self) -> Self {
        self.start_playing()
    }

    fn prompt(&self, table: &Table<'_>) -> String {
        let question = self.current().map(|q| {
            let (shown, _) = q.display(table.names);
            match q.direction {
                Direction::CountryToCapital => format!("capital of {shown}?"),
                Direction::CapitalToCountry => format!("{shown} is the capital of?"),
            }
        });
        format!(
            "{} | {}",
            sprint_clock(self.time_left(), self.multiplier(), self.score),
            question.unwrap_or_default()
        )
    }

    fn answer(self, table: &mut Table<'_>, input: &str) -> (Self, String) {
        let expected = self
            .current()
            .map(|q| q.display(table.names).1.to_string());
        let before = self.score;
        let (next, result) = self.submit(table.names, input);
        let message = match (result, expected) {
            (Answer::Correct, _) => format!("✓ +{}", next.score.saturating_sub(before)),
            (Answer::Wrong, Some(expected)) => format!("✗ It was {expected}"),
            _ => String::new(),
        };
        (next, message)
    }

    fn skip(self, table: &mut Table<'_>) -> (Self, String) {
        let message = self
            .current()
            .map(|q| format!("Skipped: {}", q.display(table.names).1))
            .unwrap_or_default();
        (Sprint::skip(self), message)
    }
}

impl Interactive for MapQuizState {
    fn create(table: &mut Table<'_>, difficulty: Difficulty, region: Region) -> Self {
        MapQuizState::create(table.world, difficulty, region, &mut table.rng)
    }

    fn intro(&self, _table: &Table<'_>) -> String {
        format!(
            "Map quiz: {}s to find each named country. Type the country you would click.",
            self.total_duration()
        )
    }

    fn begin(self) -> Self {
        self.start_playing()
    }

    fn prompt(&self, table: &Table<'_>) -> String {
        let target = self.current().map(|&c| table.label(c)).unwrap_or_default();
        format!(
            "{} | find {target}",
            sprint_clock(self.time_left(), self.multiplier(), self.score)
        )
    }

    fn answer(self, table: &mut Table<'_>, input: &str) -> (Self, String) {
        let Some(clicked) = table.names.resolve_country(input) else {
            return (self, "Unknown country".to_string());
        };
        let before = self.score;
        let (next, result) = self.click(clicked);
        let message = match result {
            Answer::Correct => format!("✓ +{}", next.score.saturating_sub(before)),
            Answer::Wrong => format!("✗ That is {}", table.label(clicked)),
            Answer::Invalid => String::new(),
        };
        (next, message)
    }

    fn skip(self, table: &mut Table<'_>) -> (Self, String) {
        let message = self
            .current()
            .map(|&c| format!("Skipped: {}", table.label(c)))
            .unwrap_or_default();
        (Sprint::skip(self), message)
    }
}

impl Interactive for BorderBlitzState {
    fn create(table: &mut Table<'_>, difficulty: Difficulty, region: Region) -> Self {
        BorderBlitzState::create(table.world, difficulty, region, &mut table.rng)
    }

    fn intro(&self, table: &Table<'_>) -> String {
        format!(
            "Border blitz: name every country bordering {} ({} neighbours) in {}s.",
            table.label(self.anchor),
            self.neighbors.len(),
            self.config().total_time
        )
    }

    fn begin(self) -> Self {
        self.start_playing()
    }

    fn prompt(&self, table: &Table<'_>) -> String {
        format!(
            "[{}s] score {} | neighbours of {}: {}/{}",
            self.time_left(),
            self.score,
            table.label(self.anchor),
            self.found.len(),
            self.neighbors.len()
        )
    }

    fn answer(self, table: &mut Table<'_>, input: &str) -> (Self, String) {
        let anchor = self.anchor;
        let (next, result) = self.submit(table.names, input);
        let named = next.guesses.last().and_then(|g| g.code);
        let message = match (result, named) {
            (BlitzResult::Correct, Some(code)) if next.is_complete() => {
                format!("✓ {}. All neighbours found!", table.label(code))
            }
            (BlitzResult::Correct, Some(code)) => format!("✓ {}", table.label(code)),
            (BlitzResult::AlreadyFound, _) => "Already found".to_string(),
            (BlitzResult::Wrong, Some(code)) => format!(
                "✗ {} does not border {}",
                table.label(code),
                table.label(anchor)
            ),
            _ => "Unknown country".to_string(),
        };
        (next, message)
    }

    fn hint(self, table: &mut Table<'_>) -> (Self, String) {
        match BorderBlitzState::hint(self, &mut table.rng) {
            (next, Some(code)) => (next, format!("Hint: {}", table.label(code))),
            (next, None) => (next, "No hint available".to_string()),
        }
    }

    fn skip(self, table: &mut Table<'_>) -> (Self, String) {
        match BorderBlitzState::skip(self, table.world, &mut table.rng) {
            (next, SkipResult::Skipped) => {
                let message = format!(
                    "New anchor: {} ({} neighbours)",
                    table.label(next.anchor),
                    next.neighbors.len()
                );
                (next, message)
            }
            (next, SkipResult::Locked) => (
                next,
                "Skip unlocks after two wrong guesses in a row".to_string(),
            ),
        }
    }
}
