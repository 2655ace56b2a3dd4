//! Geodash CLI - play, inspect and simulate the geography mini-games.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use geodash::{Difficulty, GameKind, Region};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Geodash - timed geography mini-games over a country border graph
#[derive(Parser, Debug)]
#[command(name = "geodash")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory with countries.json, adjacency.json and tiers.json (default: embedded data)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Locale file with translated country and capital names
    #[arg(long, global = true)]
    locale_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a game interactively on the terminal
    Play {
        /// Game: route, silhouette, flags, capitals, map-quiz or border-blitz
        game: GameKind,

        /// Difficulty: easy, medium or hard
        #[arg(short, long, default_value = "medium")]
        difficulty: Difficulty,

        /// Region: all or a continent name
        #[arg(short, long, default_value = "all")]
        region: Region,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Shortest land route between two countries, or a distance frontier
    Route {
        /// Start country (code or name)
        from: String,

        /// Destination country (code or name)
        #[arg(required_unless_present = "at_distance", conflicts_with = "at_distance")]
        to: Option<String>,

        /// Countries the route may not enter (comma separated)
        #[arg(short, long, value_delimiter = ',')]
        exclude: Vec<String>,

        /// List every country exactly N crossings away instead
        #[arg(long)]
        at_distance: Option<usize>,

        /// Region the frontier search may traverse
        #[arg(short, long, default_value = "all")]
        region: Region,
    },

    /// Let scripted bots play many sessions in parallel
    Simulate {
        /// Game to simulate (default: cycle through every game)
        game: Option<GameKind>,

        /// Number of sessions (default: 1000)
        #[arg(short, long, default_value = "1000")]
        games: u64,

        /// Starting seed (increments for each session)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Probability that a bot answer is correct
        #[arg(short, long, default_value = "0.8")]
        accuracy: f64,

        /// Difficulty: easy, medium or hard
        #[arg(short, long, default_value = "medium")]
        difficulty: Difficulty,

        /// Region: all or a continent name
        #[arg(short, long, default_value = "all")]
        region: Region,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },

    /// Load and validate the country dataset
    Validate,
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let data = cli::DataArgs {
        dir: args.data,
        locale_file: args.locale_file,
    };

    let result = match args.command {
        Commands::Play {
            game,
            difficulty,
            region,
            seed,
        } => cli::play::execute(&data, game, difficulty, region, seed),

        Commands::Route {
            from,
            to,
            exclude,
            at_distance,
            region,
        } => cli::route::execute(&data, &from, to.as_deref(), &exclude, at_distance, region),

        Commands::Simulate {
            game,
            games,
            seed,
            accuracy,
            difficulty,
            region,
            threads,
            format,
            progress,
        } => cli::simulate::execute(
            &data,
            cli::simulate::SimulateArgs {
                game,
                games,
                seed,
                accuracy,
                difficulty,
                region,
                threads,
                format,
                progress,
            },
        ),

        Commands::Validate => cli::validate::execute(&data),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
