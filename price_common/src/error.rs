//! Error types shared across the workspace.
//!
//! Three narrow enums describe the failure classes of the pipeline:
//! - `FetchError`: a provider call for one ticker failed.
//! - `NormalizeError`: a provider payload could not be mapped onto a `Quote`.
//! - `ConfigError`: the configuration file could not be read or parsed.
//!
//! `PriceError` unifies them with I/O and JSON failures so crates can propagate a
//! single error type with `?`.
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::tickers::AssetKind;

/// Failure of a single provider retrieval.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Transport failure, unexpected status or unreadable body.
    #[error("network error: {0}")]
    Network(String),

    /// The provider does not know the requested ticker.
    #[error("unknown ticker: {0}")]
    NotFound(String),

    /// The provider rejected the call because of rate limiting.
    #[error("rate limited by {0}")]
    RateLimited(String),
}

impl FetchError {
    /// Short label used on degraded panels.
    pub fn label(&self) -> &'static str {
        match self {
            FetchError::Network(_) => "network error",
            FetchError::NotFound(_) => "not found",
            FetchError::RateLimited(_) => "rate limited",
        }
    }
}

/// Failure while mapping a raw provider payload onto a `Quote`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// None of the candidate locations for a required field were present.
    #[error("missing field `{field}` (looked at {looked_at})")]
    MissingField {
        /// Canonical field name.
        field: &'static str,
        /// Comma-separated list of payload locations that were tried.
        looked_at: String,
    },

    /// A required field was present but not a usable price.
    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue {
        /// Canonical field name.
        field: &'static str,
        /// Human-readable reason.
        reason: String,
    },

    /// The payload variant does not belong to the requested kind.
    #[error("payload is {found} data but {expected} was requested")]
    KindMismatch {
        /// Kind requested by the caller.
        expected: AssetKind,
        /// Kind carried by the payload.
        found: AssetKind,
    },
}

/// Failure while loading the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read config {path}: {source}")]
    Read {
        /// Path that was opened.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The file is not valid JSON of the expected shape.
    #[error("cannot parse config {path}: {source}")]
    Parse {
        /// Path that was parsed.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// Unified error type shared by all crates of the workspace.
#[derive(Error, Debug)]
pub enum PriceError {
    /// I/O error originating from the standard library, files or the terminal.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Provider retrieval failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Provider payload could not be normalized.
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    /// Error while parsing a ticker list.
    #[error("Parse tickers error: {0}")]
    ParseTickers(String),
}
