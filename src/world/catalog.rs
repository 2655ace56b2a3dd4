//! The country catalog: read-only reference data plus difficulty tiers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::DataError;
use crate::world::{normalize, Continent, CountryCode, Region};

/// Obscurity ranking used to scale difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Tier {
    /// Globally recognised countries.
    Famous = 1,
    /// Regionally significant, recognisable to enthusiasts.
    Moderate = 2,
    /// Micro-states and easily confused countries.
    Obscure = 3,
}

impl Tier {
    /// Convert from the numeric level (1-3).
    #[must_use]
    pub const fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Tier::Famous),
            2 => Some(Tier::Moderate),
            3 => Some(Tier::Obscure),
            _ => None,
        }
    }

    /// The numeric level (1-3).
    #[must_use]
    pub const fn level(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Tier {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Tier::from_level(value).ok_or_else(|| format!("tier must be 1-3, got {value}"))
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> Self {
        tier.level()
    }
}

/// A single country record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    /// ISO alpha-2 code (primary key).
    pub code: CountryCode,
    /// English display name.
    pub name: String,
    /// English capital name.
    pub capital: String,
    /// Continent tag.
    pub continent: Continent,
    /// Geographic centroid as (latitude, longitude).
    pub centroid: (f64, f64),
}

/// Immutable catalog of every country, indexed by code and English name.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Countries in dataset order.
    countries: Vec<Country>,
    /// Code -> index into `countries`.
    index: HashMap<CountryCode, usize>,
    /// Tier overrides; missing codes are `Tier::Obscure`.
    tiers: HashMap<CountryCode, Tier>,
    /// Normalised English name -> code.
    by_name: HashMap<String, CountryCode>,
}

impl Catalog {
    /// Build a catalog from country records and a tier table.
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate codes or tiers for unknown countries.
    pub fn new(
        countries: Vec<Country>,
        tiers: HashMap<CountryCode, Tier>,
    ) -> Result<Self, DataError> {
        let mut index = HashMap::with_capacity(countries.len());
        let mut by_name = HashMap::with_capacity(countries.len());

        for (i, country) in countries.iter().enumerate() {
            if index.insert(country.code, i).is_some() {
                return Err(DataError::DuplicateCountry(country.code));
            }
            by_name.insert(normalize(&country.name), country.code);
        }

        if let Some(code) = tiers.keys().find(|code| !index.contains_key(code)) {
            return Err(DataError::UnknownTierCountry(*code));
        }

        Ok(Self {
            countries,
            index,
            tiers,
            by_name,
        })
    }

    /// Look up a country by code.
    #[must_use]
    pub fn get(&self, code: CountryCode) -> Option<&Country> {
        self.index.get(&code).map(|&i| &self.countries[i])
    }

    /// Whether the catalog knows this code.
    #[must_use]
    pub fn contains(&self, code: CountryCode) -> bool {
        self.index.contains_key(&code)
    }

    /// Iterate over all countries in dataset order.
    pub fn iter(&self) -> impl Iterator<Item = &Country> {
        self.countries.iter()
    }

    /// Number of countries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.countries.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    /// Difficulty tier of a country (absent entries count as obscure).
    #[must_use]
    pub fn tier(&self, code: CountryCode) -> Tier {
        self.tiers.get(&code).copied().unwrap_or(Tier::Obscure)
    }

    /// Whether a country lies inside `region`.
    #[must_use]
    pub fn in_region(&self, code: CountryCode, region: Region) -> bool {
        self.get(code).is_some_and(|c| region.matches(c.continent))
    }

    /// Code for an English country name, compared after normalisation.
    #[must_use]
    pub fn code_for_name(&self, name: &str) -> Option<CountryCode> {
        self.by_name.get(&normalize(name)).copied()
    }

    /// Codes in `region` whose tier is at most `max_tier`, in dataset order.
    #[must_use]
    pub fn pool(&self, region: Region, max_tier: Tier) -> Vec<CountryCode> {
        self.pool_where(region, max_tier, |_| true)
    }

    /// Like [`Catalog::pool`] with an extra predicate.
    pub fn pool_where(
        &self,
        region: Region,
        max_tier: Tier,
        mut keep: impl FnMut(&Country) -> bool,
    ) -> Vec<CountryCode> {
        self.countries
            .iter()
            .filter(|c| region.matches(c.continent))
            .filter(|c| self.tier(c.code) <= max_tier)
            .filter(|c| keep(c))
            .map(|c| c.code)
            .collect()
    }
}
