//! Free-text name resolution.
//!
//! The engines never bake display names into session state. They receive a
//! [`NameResolver`] at call time, so the active locale can change without
//! replaying history.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::error::DataError;
use crate::world::{Catalog, CountryCode};

/// Minimum input length for a partial capital match.
pub(crate) const MIN_PARTIAL_CAPITAL: usize = 4;

/// Fold text for comparison: trim, lowercase, strip accents.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Resolves player input to codes and codes to display names.
pub trait NameResolver {
    /// Map free text (code, English or localised name) to a known country.
    fn resolve_country(&self, input: &str) -> Option<CountryCode>;

    /// Display name of a country in the active locale.
    fn country_name(&self, code: CountryCode) -> Option<&str>;

    /// Display name of a country's capital in the active locale.
    fn capital_name(&self, code: CountryCode) -> Option<&str>;

    /// Whether `input` names the country `code`.
    fn country_matches(&self, code: CountryCode, input: &str) -> bool {
        self.resolve_country(input) == Some(code)
    }

    /// Whether `input` names the capital of `code`.
    ///
    /// Accepts an exact match, or a substring of at least four characters so
    /// that "Washington" answers "Washington, D.C.".
    fn capital_matches(&self, code: CountryCode, input: &str) -> bool {
        self.capital_name(code)
            .is_some_and(|capital| capital_text_matches(capital, input))
    }
}

/// Exact-or-substring comparison used for capitals.
pub(crate) fn capital_text_matches(expected: &str, input: &str) -> bool {
    let expected = normalize(expected);
    let given = normalize(input);
    if given.is_empty() {
        return false;
    }
    expected == given
        || (given.chars().count() >= MIN_PARTIAL_CAPITAL && expected.contains(&given))
}

/// Localised country and capital names for one locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleNames {
    /// Locale tag, e.g. `"fr"`.
    pub locale: String,
    /// Localised country names by code.
    #[serde(default)]
    pub countries: HashMap<CountryCode, String>,
    /// Localised capital names by code.
    #[serde(default)]
    pub capitals: HashMap<CountryCode, String>,
}

impl LocaleNames {
    /// Parse a locale table from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not match the table schema.
    pub fn from_json(json: &str) -> Result<Self, DataError> {
        serde_json::from_str(json).map_err(|source| DataError::Json {
            what: "locale table",
            source,
        })
    }

    /// Read a locale table from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let json = std::fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

/// Catalog-backed resolver with an optional locale layer.
#[derive(Debug, Clone)]
pub struct Names<'w> {
    catalog: &'w Catalog,
    locale: Option<&'w LocaleNames>,
    /// Normalised localised name -> code.
    localized: HashMap<String, CountryCode>,
}

impl<'w> Names<'w> {
    /// English-only resolver.
    #[must_use]
    pub fn english(catalog: &'w Catalog) -> Self {
        Self {
            catalog,
            locale: None,
            localized: HashMap::new(),
        }
    }

    /// Resolver that also understands (and displays) names from `locale`.
    #[must_use]
    pub fn with_locale(catalog: &'w Catalog, locale: &'w LocaleNames) -> Self {
        let localized = locale
            .countries
            .iter()
            .map(|(&code, name)| (normalize(name), code))
            .collect();
        Self {
            catalog,
            locale: Some(locale),
            localized,
        }
    }

    /// The active locale tag (`"en"` when none is layered).
    #[must_use]
    pub fn locale(&self) -> &str {
        self.locale.map_or("en", |l| l.locale.as_str())
    }
}

impl NameResolver for Names<'_> {
    fn resolve_country(&self, input: &str) -> Option<CountryCode> {
        if let Some(code) = CountryCode::parse(input)
            && self.catalog.contains(code)
        {
            return Some(code);
        }
        if let Some(code) = self.catalog.code_for_name(input) {
            return Some(code);
        }
        self.localized.get(&normalize(input)).copied()
    }

    fn country_name(&self, code: CountryCode) -> Option<&str> {
        self.locale
            .and_then(|l| l.countries.get(&code))
            .map(String::as_str)
            .or_else(|| self.catalog.get(code).map(|c| c.name.as_str()))
    }

    fn capital_name(&self, code: CountryCode) -> Option<&str> {
        self.locale
            .and_then(|l| l.capitals.get(&code))
            .map(String::as_str)
            .or_else(|| self.catalog.get(code).map(|c| c.capital.as_str()))
    }

    fn capital_matches(&self, code: CountryCode, input: &str) -> bool {
        let english = self
            .catalog
            .get(code)
            .is_some_and(|c| capital_text_matches(&c.capital, input));
        let localized = self
            .locale
            .and_then(|l| l.capitals.get(&code))
            .is_some_and(|capital| capital_text_matches(capital, input));
        english || localized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Continent, Country};

    fn catalog() -> Catalog {
        let make = |code: &'static str, name: &str, capital: &str| Country {
            code: CountryCode::from_static(code),
            name: name.to_string(),
            capital: capital.to_string(),
            continent: Continent::Europe,
            centroid: (0.0, 0.0),
        };
        Catalog::new(
            vec![
                make("DE", "Germany", "Berlin"),
                make("US", "United States", "Washington, D.C."),
                make("MX", "Mexico", "Mexico City"),
            ],
            HashMap::new(),
        )
        .unwrap()
    }

    fn french() -> LocaleNames {
        LocaleNames::from_json(
            r#"{"locale":"fr","countries":{"DE":"Allemagne","MX":"Mexique"},"capitals":{"MX":"Mexico"}}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_normalize_strips_accents_and_case() {
        assert_eq!(normalize("  Côte d'Ivoire "), "cote d'ivoire");
        assert_eq!(normalize("SÃO TOMÉ"), "sao tome");
        assert_eq!(normalize("Ελλάδα"), "ελλαδα");
    }

    #[test]
    fn test_resolve_code_and_english_name() {
        let catalog = catalog();
        let names = Names::english(&catalog);
        assert_eq!(names.resolve_country("de"), Some(CountryCode::from_static("DE")));
        assert_eq!(
            names.resolve_country("united states"),
            Some(CountryCode::from_static("US"))
        );
        assert_eq!(names.resolve_country("Allemagne"), None);
        // A two-letter word that is not a known code is not a country
        assert_eq!(names.resolve_country("zz"), None);
    }

    #[test]
    fn test_resolve_localized_name() {
        let catalog = catalog();
        let fr = french();
        let names = Names::with_locale(&catalog, &fr);
        assert_eq!(names.resolve_country("allemagne"), Some(CountryCode::from_static("DE")));
        assert_eq!(names.country_name(CountryCode::from_static("DE")), Some("Allemagne"));
        // Falls back to English where the locale has no entry
        assert_eq!(
            names.country_name(CountryCode::from_static("US")),
            Some("United States")
        );
        assert_eq!(names.locale(), "fr");
    }

    #[test]
    fn test_capital_partial_match() {
        let catalog = catalog();
        let names = Names::english(&catalog);
        let us = CountryCode::from_static("US");
        assert!(names.capital_matches(us, "Washington"));
        assert!(names.capital_matches(us, "washington, d.c."));
        assert!(!names.capital_matches(us, "Was"));
        assert!(!names.capital_matches(us, ""));
        assert!(!names.capital_matches(us, "Berlin"));
    }

    #[test]
    fn test_capital_matches_localized_or_english() {
        let catalog = catalog();
        let fr = french();
        let names = Names::with_locale(&catalog, &fr);
        let mx = CountryCode::from_static("MX");
        assert!(names.capital_matches(mx, "Mexico City"));
        assert!(names.capital_matches(mx, "mexico"));
        assert_eq!(names.capital_name(mx), Some("Mexico"));
    }

    #[test]
    fn test_country_matches() {
        let catalog = catalog();
        let names = Names::english(&catalog);
        let de = CountryCode::from_static("DE");
        assert!(names.country_matches(de, "germany"));
        assert!(names.country_matches(de, "DE"));
        assert!(!names.country_matches(de, "Mexico"));
    }
}
