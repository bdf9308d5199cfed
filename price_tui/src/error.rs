//! Errors of the board front end and their exit codes.
use price_common::{ConfigError, PriceError};
use thiserror::Error;

/// Failure to lay out a frame.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// More panels than the configuration allows on one screen.
    #[error("{count} tickers requested, at most {max} can be shown")]
    TooManyPanels {
        /// Panels requested.
        count: usize,
        /// Configured `max_tickers`.
        max: usize,
    },
}

/// CLI-level error categories mapped to exit codes.
#[derive(Error, Debug)]
pub enum CliError {
    /// Nothing usable was left after parsing the ticker arguments.
    #[error("no valid tickers given")]
    NoTickers,

    /// Too many tickers for one screen.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Every requested ticker failed.
    #[error("none of the {0} ticker(s) could be resolved to market data")]
    NothingResolved(usize),

    /// I/O and other workspace errors.
    #[error(transparent)]
    Price(#[from] PriceError),

    /// Terminal write failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The Ctrl+C handler could not be installed.
    #[error("cannot install Ctrl+C handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::NoTickers | Self::Render(_) => 2,
            Self::Config(_) | Self::Price(PriceError::Config(_)) => 3,
            Self::NothingResolved(_) | Self::Price(_) | Self::Io(_) | Self::Signal(_) => 1,
        }
    }
}
