//! Dataset loading: catalog + border graph, validated once at startup.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use tracing::debug;

use crate::error::DataError;
use crate::rng::Rng;
use crate::world::{Catalog, Country, CountryCode, CountryGraph, Names, Region, Tier};

const EMBEDDED_COUNTRIES: &str = include_str!("../../data/countries.json");
const EMBEDDED_ADJACENCY: &str = include_str!("../../data/adjacency.json");
const EMBEDDED_TIERS: &str = include_str!("../../data/tiers.json");

/// Read-only reference data for every session: the catalog and its graph.
///
/// Built once, then shared by reference. Construction validates the data so
/// the engines can treat it as trusted.
#[derive(Debug, Clone)]
pub struct World {
    catalog: Catalog,
    graph: CountryGraph,
}

impl World {
    /// Combine a catalog and a graph.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::UnknownCountry`] if the graph names a code the
    /// catalog lacks.
    pub fn new(catalog: Catalog, graph: CountryGraph) -> Result<Self, DataError> {
        for code in graph.connected() {
            if !catalog.contains(code) {
                return Err(DataError::UnknownCountry(code));
            }
            if let Some(&missing) = graph.neighbors(code).iter().find(|n| !catalog.contains(**n)) {
                return Err(DataError::UnknownCountry(missing));
            }
        }
        debug!(
            countries = catalog.len(),
            bordered = graph.len(),
            "world loaded"
        );
        Ok(Self { catalog, graph })
    }

    /// The dataset compiled into the crate.
    ///
    /// # Errors
    ///
    /// Returns an error only if the bundled data is corrupt.
    pub fn embedded() -> Result<Self, DataError> {
        Self::from_json(EMBEDDED_COUNTRIES, EMBEDDED_ADJACENCY, EMBEDDED_TIERS)
    }

    /// Load `countries.json`, `adjacency.json` and `tiers.json` from `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if a file is missing, malformed or inconsistent.
    pub fn load(dir: &Path) -> Result<Self, DataError> {
        let read = |name: &str| {
            let path = dir.join(name);
            std::fs::read_to_string(&path).map_err(|source| DataError::Io { path, source })
        };
        let countries = read("countries.json")?;
        let adjacency = read("adjacency.json")?;
        let tiers = read("tiers.json")?;
        Self::from_json(&countries, &adjacency, &tiers)
    }

    /// Parse and validate the three dataset documents.
    ///
    /// # Errors
    ///
    /// Returns an error if any document is malformed or inconsistent.
    pub fn from_json(countries: &str, adjacency: &str, tiers: &str) -> Result<Self, DataError> {
        let countries: Vec<Country> =
            serde_json::from_str(countries).map_err(|source| DataError::Json {
                what: "countries",
                source,
            })?;
        let adjacency: Entries<Vec<CountryCode>> = serde_json::from_str(adjacency)
            .map_err(|source| DataError::Json {
                what: "adjacency",
                source,
            })?;
        let raw_tiers: Entries<u8> =
            serde_json::from_str(tiers).map_err(|source| DataError::Json {
                what: "tiers",
                source,
            })?;
        let adjacency = adjacency.into_unique("adjacency")?;
        let raw_tiers = raw_tiers.into_unique("tiers")?;

        let mut tiers = HashMap::with_capacity(raw_tiers.len());
        for (code, level) in raw_tiers {
            let tier =
                Tier::from_level(level).ok_or(DataError::InvalidTier { code, tier: level })?;
            tiers.insert(code, tier);
        }

        let catalog = Catalog::new(countries, tiers)?;
        let graph = CountryGraph::new(adjacency)?;
        Self::new(catalog, graph)
    }

    /// The country catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The land-border graph.
    #[must_use]
    pub fn graph(&self) -> &CountryGraph {
        &self.graph
    }

    /// English name resolver over this catalog.
    #[must_use]
    pub fn names(&self) -> Names<'_> {
        Names::english(&self.catalog)
    }

    /// Countries exactly `depth` hops from `start`, traversing only `region`.
    #[must_use]
    pub fn countries_at_distance(
        &self,
        start: CountryCode,
        depth: usize,
        region: Region,
    ) -> Vec<CountryCode> {
        self.graph
            .countries_at_distance(start, depth, |c| self.catalog.in_region(c, region))
    }

    /// Random land-bordered country in `region` (any region if none qualify).
    pub fn random_connected(&self, region: Region, rng: &mut Rng) -> Option<CountryCode> {
        self.graph
            .random_connected(rng, |c| self.catalog.in_region(c, region))
    }

    /// Display name for a code, falling back to the code itself.
    #[must_use]
    pub fn label(&self, code: CountryCode) -> String {
        self.catalog
            .get(code)
            .map_or_else(|| code.to_string(), |c| c.name.clone())
    }
}

/// Object entries keyed by country code, in document order.
///
/// Unlike a map, repeated keys survive parsing so they can be rejected.
#[derive(Debug)]
struct Entries<V>(Vec<(CountryCode, V)>);

impl<V> Entries<V> {
    fn into_unique(self, what: &'static str) -> Result<BTreeMap<CountryCode, V>, DataError> {
        let mut map = BTreeMap::new();
        for (code, value) in self.0 {
            if map.insert(code, value).is_some() {
                return Err(DataError::DuplicateKey { what, code });
            }
        }
        Ok(map)
    }
}

struct EntriesVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
    type Value = Entries<V>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("an object keyed by country code")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(entry) = access.next_entry()? {
            entries.push(entry);
        }
        Ok(Entries(entries))
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for Entries<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Continent;

    fn code(s: &'static str) -> CountryCode {
        CountryCode::from_static(s)
    }

    #[test]
    fn test_embedded_world_loads() {
        let world = World::embedded().unwrap();
        assert!(world.catalog().len() > 150);
        assert!(world.graph().len() > 100);
        assert_eq!(world.graph().neighbors(code("DE")).len(), 9);
        assert!(!world.graph().has_land_borders(code("JP")));
    }

    #[test]
    fn test_embedded_graph_is_symmetric() {
        let world = World::embedded().unwrap();
        let graph = world.graph();
        for a in graph.connected() {
            for &b in graph.neighbors(a) {
                assert!(graph.is_neighbor(b, a), "{a} -> {b} has no reverse edge");
            }
        }
    }

    #[test]
    fn test_region_restricted_frontier() {
        let world = World::embedded().unwrap();
        let europe = Region::Only(Continent::Europe);
        let frontier = world.countries_at_distance(code("PT"), 2, europe);
        assert_eq!(frontier, vec![code("FR"), code("AD")]);
        // Spain's only non-European neighbour is Morocco
        let any = world.countries_at_distance(code("PT"), 2, Region::All);
        assert!(any.contains(&code("MA")));
    }

    #[test]
    fn test_unknown_graph_country_rejected() {
        let countries = r#"[{"code":"AA","name":"Aland","capital":"A","continent":"Europe","centroid":[0,0]}]"#;
        let adjacency = r#"{"AA":["BB"],"BB":["AA"]}"#;
        let err = World::from_json(countries, adjacency, "{}").unwrap_err();
        assert!(matches!(err, DataError::UnknownCountry(_)));
    }

    #[test]
    fn test_invalid_tier_rejected() {
        let countries = r#"[{"code":"AA","name":"Aland","capital":"A","continent":"Europe","centroid":[0,0]}]"#;
        let err = World::from_json(countries, "{}", r#"{"AA":7}"#).unwrap_err();
        assert!(matches!(err, DataError::InvalidTier { tier: 7, .. }));
    }

    #[test]
    fn test_malformed_json_reports_section() {
        let err = World::from_json("[", "{}", "{}").unwrap_err();
        assert!(err.to_string().contains("countries"));
    }
}
