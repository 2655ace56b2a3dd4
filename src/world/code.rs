//! Country codes, continents and region filters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An ISO 3166-1 alpha-2 country code, always two ASCII uppercase letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode([u8; 2]);

/// Error for text that is not a two-letter code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid country code {0:?}")]
pub struct ParseCodeError(pub String);

impl CountryCode {
    /// Build a code from a literal such as `"PT"`.
    ///
    /// # Panics
    ///
    /// Panics (at compile time in const contexts) unless `s` is exactly two
    /// ASCII uppercase letters.
    #[must_use]
    pub const fn from_static(s: &str) -> Self {
        let b = s.as_bytes();
        assert!(b.len() == 2, "country code must have two letters");
        assert!(b[0].is_ascii_uppercase() && b[1].is_ascii_uppercase());
        Self([b[0], b[1]])
    }

    /// Parse a code case-insensitively, ignoring surrounding whitespace.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().as_bytes() {
            [a, b] if a.is_ascii_alphabetic() && b.is_ascii_alphabetic() => {
                Some(Self([a.to_ascii_uppercase(), b.to_ascii_uppercase()]))
            }
            _ => None,
        }
    }

    /// The code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Both bytes are ASCII letters by construction
        std::str::from_utf8(&self.0).unwrap_or("??")
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CountryCode {
    type Err = ParseCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ParseCodeError(s.to_string()))
    }
}

impl TryFrom<String> for CountryCode {
    type Error = ParseCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CountryCode> for String {
    fn from(code: CountryCode) -> Self {
        code.as_str().to_string()
    }
}

/// Continent tag carried by every country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Continent {
    /// Africa.
    Africa,
    /// Asia.
    Asia,
    /// Europe.
    Europe,
    /// North and Central America with the Caribbean.
    #[serde(rename = "North America")]
    NorthAmerica,
    /// South America.
    #[serde(rename = "South America")]
    SouthAmerica,
    /// Oceania.
    Oceania,
}

impl Continent {
    /// All continents in display order.
    pub const ALL: [Continent; 6] = [
        Continent::Europe,
        Continent::Asia,
        Continent::Africa,
        Continent::NorthAmerica,
        Continent::SouthAmerica,
        Continent::Oceania,
    ];

    /// Human-readable name, matching the dataset spelling.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Continent::Africa => "Africa",
            Continent::Asia => "Asia",
            Continent::Europe => "Europe",
            Continent::NorthAmerica => "North America",
            Continent::SouthAmerica => "South America",
            Continent::Oceania => "Oceania",
        }
    }
}

impl fmt::Display for Continent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Continent {
    type Err = ParseCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Continent::ALL
            .into_iter()
            .find(|c| c.name().replace(' ', "").eq_ignore_ascii_case(&key))
            .ok_or_else(|| ParseCodeError(s.to_string()))
    }
}

/// Continent filter applied when sampling countries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Region {
    /// No restriction.
    #[default]
    All,
    /// Only countries on this continent.
    Only(Continent),
}

impl Region {
    /// Whether a country on `continent` passes this filter.
    #[must_use]
    pub fn matches(self, continent: Continent) -> bool {
        match self {
            Region::All => true,
            Region::Only(c) => c == continent,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::All => f.write_str("all"),
            Region::Only(c) => c.fmt(f),
        }
    }
}

impl FromStr for Region {
    type Err = ParseCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Region::All);
        }
        s.parse().map(Region::Only)
    }
}

impl TryFrom<String> for Region {
    type Error = ParseCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Region> for String {
    fn from(region: Region) -> Self {
        region.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_code_case_insensitive() {
        assert_eq!(CountryCode::parse(" pt "), Some(CountryCode::from_static("PT")));
        assert_eq!(CountryCode::parse("Gr"), Some(CountryCode::from_static("GR")));
        assert!(CountryCode::parse("P").is_none());
        assert!(CountryCode::parse("PRT").is_none());
        assert!(CountryCode::parse("P1").is_none());
    }

    #[test]
    fn test_code_serde_as_string() {
        let code = CountryCode::from_static("DE");
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "\"DE\"");
        let back: CountryCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, code);
        assert!(serde_json::from_str::<CountryCode>("\"DEU\"").is_err());
    }

    #[test]
    fn test_continent_parse() {
        assert_eq!("europe".parse::<Continent>().unwrap(), Continent::Europe);
        assert_eq!(
            "north-america".parse::<Continent>().unwrap(),
            Continent::NorthAmerica
        );
        assert_eq!(
            "South America".parse::<Continent>().unwrap(),
            Continent::SouthAmerica
        );
        assert!("atlantis".parse::<Continent>().is_err());
    }

    #[test]
    fn test_region_parse_and_match() {
        assert_eq!("ALL".parse::<Region>().unwrap(), Region::All);
        let asia: Region = "asia".parse().unwrap();
        assert!(asia.matches(Continent::Asia));
        assert!(!asia.matches(Continent::Europe));
        assert!(Region::All.matches(Continent::Oceania));
        assert_eq!(asia.to_string(), "Asia");
    }
}
