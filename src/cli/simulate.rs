//! Simulate command implementation.

use super::output::{format_batch_text, JsonBatchResult};
use super::{CliError, DataArgs, OutputFormat};
use geodash::sim::{run_batch, BotProfile, SimConfig};
use geodash::{Difficulty, GameKind, Region};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;

/// Options for the simulate command.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SimulateArgs {
    /// Single game, or every game in turn.
    pub(crate) game: Option<GameKind>,
    /// Number of sessions.
    pub(crate) games: u64,
    /// Base seed.
    pub(crate) seed: Option<u64>,
    /// Bot answer accuracy.
    pub(crate) accuracy: f64,
    /// Session difficulty.
    pub(crate) difficulty: Difficulty,
    /// Session region.
    pub(crate) region: Region,
    /// Rayon thread count.
    pub(crate) threads: Option<usize>,
    /// Output format.
    pub(crate) format: OutputFormat,
    /// Show a progress bar.
    pub(crate) progress: bool,
}

/// Execute the simulate command.
///
/// # Errors
///
/// Returns an error if the dataset fails to load, the accuracy is out of
/// range, or JSON output fails.
pub(crate) fn execute(data: &DataArgs, args: SimulateArgs) -> Result<(), CliError> {
    if !(0.0..=1.0).contains(&args.accuracy) {
        return Err(CliError::new(format!(
            "Accuracy must be between 0 and 1, got {}",
            args.accuracy
        )));
    }
    let world = data.world()?;

    // Set thread pool size if specified
    if let Some(num_threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let base_seed = args.seed.unwrap_or_else(super::play::clock_seed);

    let config = SimConfig {
        difficulty: args.difficulty,
        region: args.region,
        bot: BotProfile {
            accuracy: args.accuracy,
            ..BotProfile::default()
        },
        ..SimConfig::default()
    };

    let pb = if args.progress {
        let pb = ProgressBar::new(args.games);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} sessions ({per_sec})")
                .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let stats = run_batch(&world, args.games, base_seed, args.game, &config);

    // Update progress bar after completion (no atomic overhead in hot path)
    if let Some(pb) = pb {
        pb.set_position(stats.games_played);
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();

    #[allow(clippy::cast_precision_loss)]
    let per_sec = if duration.as_secs_f64() > 0.0 {
        stats.games_played as f64 / duration.as_secs_f64()
    } else {
        0.0
    };

    match args.format {
        OutputFormat::Text => {
            println!();
            print!("{}", format_batch_text(&stats));
            println!();
            println!("Seed: {base_seed}");
            println!(
                "Duration: {:.2}s ({per_sec:.0} sessions/sec)",
                duration.as_secs_f64()
            );
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonBatchResult {
                base_seed,
                duration_secs: duration.as_secs_f64(),
                stats: &stats,
            })
            .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
    }

    if stats.total_violations() > 0 {
        return Err(CliError::new(format!(
            "{} invariant violations detected",
            stats.total_violations()
        )));
    }
    Ok(())
}
