//! Output formatting utilities for CLI.

use geodash::sim::BatchStats;
use geodash::CountryCode;
use serde::Serialize;
use std::fmt::Write as _;

/// JSON-serializable batch result.
#[derive(Debug, Serialize)]
pub(super) struct JsonBatchResult<'a> {
    /// First seed of the batch.
    pub(super) base_seed: u64,
    /// Wall-clock seconds spent.
    pub(super) duration_secs: f64,
    /// Aggregated statistics.
    pub(super) stats: &'a BatchStats,
}

/// Format batch statistics as human-readable text.
pub(super) fn format_batch_text(stats: &BatchStats) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Simulation Results ({} sessions)", stats.games_played);
    let _ = writeln!(output, "{}", "=".repeat(72));
    let _ = writeln!(
        output,
        "{:<14} {:>7} {:>9} {:>10} {:>7} {:>7} {:>10}",
        "Game", "Played", "Finished", "Mean", "Min", "Max", "Violations"
    );
    let _ = writeln!(output, "{}", "-".repeat(72));

    for k in stats.per_game.iter().filter(|k| k.games > 0) {
        let _ = writeln!(
            output,
            "{:<14} {:>7} {:>9} {:>10.1} {:>7} {:>7} {:>10}",
            k.kind.name(),
            k.games,
            k.finished,
            k.mean_score(),
            k.min_score.map_or_else(|| "-".to_string(), |s| s.to_string()),
            k.max_score.map_or_else(|| "-".to_string(), |s| s.to_string()),
            k.violations
        );
    }

    if !stats.sample_violations.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "Sample violations:");
        for message in &stats.sample_violations {
            let _ = writeln!(output, "  - {message}");
        }
    }

    output
}

/// Render a path as `A -> B -> C`.
pub(super) fn format_path(path: &[CountryCode], label: impl Fn(CountryCode) -> String) -> String {
    path.iter()
        .map(|&c| format!("{} ({c})", label(c)))
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Flag emoji for a country code, built from regional indicator symbols.
pub(super) fn flag_emoji(code: CountryCode) -> String {
    code.as_str()
        .bytes()
        .filter_map(|b| char::from_u32(0x1F1E6 + u32::from(b.saturating_sub(b'A'))))
        .collect()
}

/// Print a single validation check line.
pub(super) fn print_check(name: &str, ok: bool) {
    let status = if ok { "OK" } else { "FAILED" };
    let symbol = if ok { "✓" } else { "✗" };
    println!("  {symbol} {name}: {status}");
}

/// Pretty JSON for any stats value, or its debug form if serialization fails.
pub(super) fn pretty<T: Serialize + std::fmt::Debug>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| format!("{value:#?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_emoji() {
        assert_eq!(flag_emoji(CountryCode::from_static("FR")), "\u{1F1EB}\u{1F1F7}");
    }

    #[test]
    fn test_format_path() {
        let path = [CountryCode::from_static("ES"), CountryCode::from_static("FR")];
        assert_eq!(format_path(&path, |c| c.to_string()), "ES (ES) -> FR (FR)");
    }

    #[test]
    fn test_batch_text_skips_unplayed_games() {
        let text = format_batch_text(&BatchStats::new());
        assert!(text.contains("0 sessions"));
        assert!(!text.contains("route"));
    }
}
