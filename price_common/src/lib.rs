//!
//! Common types and the data-normalization core shared by the fetcher and the TUI.
//!
//! This crate aggregates:
//! - `error`: failure classes (`FetchError`, `NormalizeError`, `ConfigError`) and the
//!   unified `PriceError`.
//! - `result`: handy `Result<T, PriceError>` alias.
//! - `tickers`: `Symbol`, `AssetKind` classification and ticker-list parsing.
//! - `config`: the immutable `DisplayConfig` and its JSON loader.
//! - `payload`: raw provider documents as a tagged union.
//! - `quote`: the canonical `Quote` and its derived fields.
//! - `normalize`: mapping tables from provider payloads to `Quote`.
//! - `history`: time-bucket downsampling of price history.
#![warn(missing_docs)]
pub mod config;
pub mod error;
pub mod history;
pub mod normalize;
pub mod payload;
pub mod quote;
pub mod result;
pub mod tickers;

pub use config::{ColorRole, DisplayConfig, Rgb};
pub use error::{ConfigError, FetchError, NormalizeError, PriceError};
pub use history::{BucketedSeries, downsample};
pub use normalize::normalize;
pub use payload::RawPayload;
pub use quote::{CHART_DAYS, Direction, PercentChange, PricePoint, Quote};
pub use result::Result;
pub use tickers::{AssetKind, Symbol, TickerParser};
