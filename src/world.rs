//! Static reference data shared by every game.
//!
//! - Country codes, continents, regions and tiers
//! - The country catalog (names, capitals, centroids, tiers)
//! - The land-border graph with breadth-first search queries
//! - Name resolution for free-text answers
//! - Dataset loading and integrity validation

mod catalog;
mod code;
mod dataset;
mod graph;
mod names;

pub use catalog::{Catalog, Country, Tier};
pub use code::{Continent, CountryCode, ParseCodeError, Region};
pub use dataset::World;
pub use graph::CountryGraph;
pub use names::{normalize, LocaleNames, NameResolver, Names};
