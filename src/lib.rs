// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Geodash: timed geography mini-game engines.
//!
//! This crate provides the pure session engines behind a set of short
//! geography games, played against a country catalog and its land-border graph:
//! - Route-Connect: walk from one country to another through land borders
//! - Silhouette-ID: name a country from its outline with progressive hints
//! - Flag-Sprint, Capital-Clash, Map-Quiz: timed answer queues with streaks
//! - Border-Blitz: name every neighbour of an anchor country
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Driver (CLI / simulator / UI)     │
//! ├─────────────────────────────────────┤
//! │   Session engines (pure, by value)  │
//! ├─────────────────────────────────────┤
//! │   World: catalog + border graph     │
//! └─────────────────────────────────────┘
//! ```
//!
//! Every transition consumes a session state and returns a new one. The
//! engines never schedule anything: the driver calls `tick()` once per second.

pub mod error;
pub mod game;
pub mod rng;
pub mod sim;
pub mod world;

pub use error::DataError;
pub use rng::Rng;

// Re-export key types at crate root for convenience
pub use game::{Difficulty, GameKind, Session};
pub use world::{
    Catalog, Continent, Country, CountryCode, CountryGraph, LocaleNames, NameResolver, Names,
    Region, Tier, World,
};
