//! Market data retrieval.
//!
//! This crate owns every network call of the price board:
//! - `provider`: the `QuoteProvider` seam and the shared blocking HTTP transport
//!   with its status-to-`FetchError` mapping.
//! - `equity`: listed symbols via the Yahoo v8 chart endpoint.
//! - `digital_asset`: coins via CoinGecko spot price and market chart.
//! - `orchestrator`: `Fetcher::fetch_all`, one concurrent retrieval per symbol with
//!   outcomes gathered in request order.
//! - `net`: endpoints, timeout and user agent.
#![warn(missing_docs)]
pub mod digital_asset;
pub mod equity;
pub mod net;
pub mod orchestrator;
pub mod provider;

pub use digital_asset::DigitalAssetProvider;
pub use equity::EquityProvider;
pub use orchestrator::{FetchOutcome, FetchReport, Fetcher};
pub use provider::{HttpTransport, QuoteProvider};
