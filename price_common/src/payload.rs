//! Raw provider payloads as handed over by the fetch layer.
//!
//! Each variant keeps the provider documents untouched (`serde_json::Value`); the
//! normalizer is the only place that knows where canonical fields live inside them.
use serde_json::Value;

use crate::tickers::AssetKind;

/// Provider response for one ticker, tagged by the provider family that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum RawPayload {
    /// Equity chart document: quote metadata plus the daily close series.
    Equity {
        /// Chart document.
        chart: Value,
    },
    /// Digital-asset documents: spot price and price history.
    DigitalAsset {
        /// Provider-side asset identifier, e.g. `bitcoin`.
        asset_id: String,
        /// Lowercase quote currency used in the request, e.g. `usd`.
        currency: String,
        /// Spot price document.
        price: Value,
        /// History document; `Value::Null` when the history call failed.
        chart: Value,
    },
}

impl RawPayload {
    /// Kind of instrument this payload describes.
    pub fn kind(&self) -> AssetKind {
        match self {
            RawPayload::Equity { .. } => AssetKind::Equity,
            RawPayload::DigitalAsset { .. } => AssetKind::DigitalAsset,
        }
    }
}
