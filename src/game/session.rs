//! The surface every game session exposes to drivers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which mini-game a session plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameKind {
    /// Walk a land route between two countries.
    Route,
    /// Identify countries from their outline.
    Silhouette,
    /// Timed flag identification.
    Flags,
    /// Timed capital/country matching.
    Capitals,
    /// Timed click-the-country map quiz.
    MapQuiz,
    /// Name every neighbour of an anchor country.
    BorderBlitz,
}

impl GameKind {
    /// Every game, in menu order.
    pub const ALL: [GameKind; 6] = [
        GameKind::Route,
        GameKind::Silhouette,
        GameKind::Flags,
        GameKind::Capitals,
        GameKind::MapQuiz,
        GameKind::BorderBlitz,
    ];

    /// Command-line name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            GameKind::Route => "route",
            GameKind::Silhouette => "silhouette",
            GameKind::Flags => "flags",
            GameKind::Capitals => "capitals",
            GameKind::MapQuiz => "map-quiz",
            GameKind::BorderBlitz => "border-blitz",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GameKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        GameKind::ALL
            .into_iter()
            .find(|k| k.name() == wanted)
            .ok_or_else(|| {
                let names: Vec<_> = GameKind::ALL.iter().map(|k| k.name()).collect();
                format!("unknown game {s:?} (expected one of {})", names.join(", "))
            })
    }
}

/// Common view of a session state.
///
/// Transitions consume the state and return the next one, so a driver holds
/// exactly one value per session and older snapshots are plain clones.
pub trait Session: Clone {
    /// End-of-game summary.
    type Stats: fmt::Debug + Clone + PartialEq + Serialize;

    /// Which game this is.
    fn kind(&self) -> GameKind;

    /// Current score (never negative).
    fn score(&self) -> u32;

    /// Append-only progress counter; never decreases within a session.
    fn progress(&self) -> usize;

    /// Ordinal of the current phase; never decreases within a session.
    fn phase_rank(&self) -> u32;

    /// Whether the session reached its terminal phase.
    fn is_finished(&self) -> bool;

    /// Advance the clock by one second.
    #[must_use]
    fn tick(self) -> Self;

    /// Summary derived from the current state.
    fn stats(&self) -> Self::Stats;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_kind_parse() {
        assert_eq!("map_quiz".parse::<GameKind>().unwrap(), GameKind::MapQuiz);
        assert_eq!("Border-Blitz".parse::<GameKind>().unwrap(), GameKind::BorderBlitz);
        let err = "chess".parse::<GameKind>().unwrap_err();
        assert!(err.contains("silhouette"));
        for kind in GameKind::ALL {
            assert_eq!(kind.name().parse::<GameKind>().unwrap(), kind);
        }
    }
}
