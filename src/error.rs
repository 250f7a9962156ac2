//! Error handling for carpark enrichment operations.
//!
//! Each failure kind of the pipeline has its own type so that the stages can
//! match on it: only [`FetchError`] ever escapes a pipeline run, the others are
//! absorbed per record (or per catalog load) and logged.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to load the static facility catalog.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Catalog source not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Failed to read catalog source {source_name}: {source}")]
    Io {
        source_name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed catalog source {source_name}: {source}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },

    #[error("Catalog source {source_name} is missing required column '{column}'")]
    MissingColumn {
        source_name: String,
        column: &'static str,
    },
}

/// Failure to obtain the live availability feed. Fatal to a pipeline run.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request to {url} timed out after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("Request to {url} failed with HTTP status {status}")]
    Http { url: String, status: u16 },

    #[error("Network error while fetching {url}: {message}")]
    Network { url: String, message: String },

    #[error("Malformed feed from {origin}: {reason}")]
    MalformedFeed { origin: String, reason: String },

    #[error("Failed to read feed snapshot {path}: {source}")]
    Snapshot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// Create a malformed feed error
    pub fn malformed(origin: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedFeed {
            origin: origin.into(),
            reason: reason.into(),
        }
    }
}

/// Failure to convert a local coordinate pair into latitude/longitude.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("Missing {axis} coordinate")]
    Missing { axis: &'static str },

    #[error("Unparseable {axis} coordinate '{value}'")]
    Unparseable { axis: &'static str, value: String },

    #[error("Non-finite coordinate input ({x}, {y})")]
    NonFinite { x: f64, y: f64 },

    #[error("Coordinate ({x}, {y}) is outside the projection domain")]
    OutOfDomain { x: f64, y: f64 },
}

/// A single feed entry that cannot be turned into an availability reading.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("Feed entry has no carpark_number")]
    MissingIdentifier,

    #[error("Feed entry {carpark_number} is missing field '{field}'")]
    MissingField {
        carpark_number: String,
        field: &'static str,
    },

    #[error("Feed entry {carpark_number} has invalid {field} '{value}'")]
    InvalidField {
        carpark_number: String,
        field: &'static str,
        value: String,
    },
}

/// Crate-wide error type
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
