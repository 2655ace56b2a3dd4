//! Error types for dataset loading.
//!
//! Game transitions never fail: every outcome is an explicit result tag.
//! The only fallible surface is building a [`World`](crate::World) from raw
//! data, where integrity problems are rejected up front.

use std::path::PathBuf;

use thiserror::Error;

use crate::world::CountryCode;

/// Errors raised while loading or validating the country dataset.
#[derive(Debug, Error)]
pub enum DataError {
    /// A data file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A data file is not valid JSON for its schema.
    #[error("malformed {what}: {source}")]
    Json {
        /// Which dataset section failed to parse.
        what: &'static str,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
    /// A country code appears twice in the catalog.
    #[error("duplicate country code {0}")]
    DuplicateCountry(CountryCode),
    /// A country code is keyed twice in the adjacency or tier table.
    #[error("{what} lists country {code} twice")]
    DuplicateKey {
        /// Which dataset section repeats the key.
        what: &'static str,
        /// The repeated code.
        code: CountryCode,
    },
    /// The adjacency data references a code absent from the catalog.
    #[error("border data references unknown country {0}")]
    UnknownCountry(CountryCode),
    /// A country lists itself as a neighbour.
    #[error("country {0} borders itself")]
    SelfBorder(CountryCode),
    /// `a` lists `b` as a neighbour but `b` does not list `a`.
    #[error("asymmetric border: {a} lists {b} but not the reverse")]
    AsymmetricBorder {
        /// Country declaring the border.
        a: CountryCode,
        /// Country missing the reverse entry.
        b: CountryCode,
    },
    /// A tier value outside 1..=3.
    #[error("country {code} has invalid tier {tier}")]
    InvalidTier {
        /// Offending country.
        code: CountryCode,
        /// The raw value found.
        tier: u8,
    },
    /// A tier entry for a code absent from the catalog.
    #[error("tier table references unknown country {0}")]
    UnknownTierCountry(CountryCode),
}
