//! CLI command implementations for Geodash.

pub(crate) mod play;
pub(crate) mod route;
pub(crate) mod simulate;
pub(crate) mod validate;

mod output;

use clap::ValueEnum;
use geodash::{DataError, LocaleNames, World};
use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use tracing::debug;

/// Output format for the `simulate` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Where the dataset and optional locale come from.
#[derive(Debug, Clone, Default)]
pub(crate) struct DataArgs {
    /// Dataset directory; embedded data when absent.
    pub(crate) dir: Option<PathBuf>,
    /// Locale JSON file.
    pub(crate) locale_file: Option<PathBuf>,
}

impl DataArgs {
    /// Load and validate the world.
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset cannot be read or fails validation.
    pub(crate) fn world(&self) -> Result<World, CliError> {
        let world = match &self.dir {
            Some(dir) => World::load(dir)?,
            None => World::embedded()?,
        };
        debug!(
            countries = world.catalog().len(),
            bordered = world.graph().len(),
            "world loaded"
        );
        Ok(world)
    }

    /// Load the locale table, if one was given.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub(crate) fn locale(&self) -> Result<Option<LocaleNames>, CliError> {
        self.locale_file
            .as_deref()
            .map(LocaleNames::load)
            .transpose()
            .map_err(CliError::from)
    }
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<DataError> for CliError {
    fn from(e: DataError) -> Self {
        Self::new(format!("Dataset error: {e}"))
    }
}
