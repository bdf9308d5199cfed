//! Digital-asset provider backed by CoinGecko.
//!
//! Two calls per symbol: the spot price with its 24h change, then the daily history.
//! The spot call decides success; a failed history call is logged and handed on as
//! `Value::Null` so the panel still shows the price.
use log::warn;
use price_common::{AssetKind, FetchError, PriceError, RawPayload, Symbol};
use serde_json::Value;

use crate::net::{self, DIGITAL_ASSET_BASE, DIGITAL_ASSET_DAYS};
use crate::provider::{HttpTransport, QuoteProvider};

/// Fetches spot price and history for a coin, quoted in one currency.
pub struct DigitalAssetProvider {
    transport: HttpTransport,
    base_url: String,
    currency: String,
}

impl DigitalAssetProvider {
    /// Provider against the public API, quoting in `currency` (e.g. `usd`).
    pub fn new(currency: &str) -> Result<Self, PriceError> {
        Self::with_base_url(DIGITAL_ASSET_BASE, currency)
    }

    /// Provider against another API root with the same shape.
    pub fn with_base_url(base_url: &str, currency: &str) -> Result<Self, PriceError> {
        Ok(Self {
            transport: HttpTransport::new("coingecko")?,
            base_url: base_url.to_string(),
            currency: currency.to_ascii_lowercase(),
        })
    }
}

/// Provider-side identifier for a symbol.
///
/// Known coins use their registered id; anything else falls back to the lowercase
/// ticker.
pub fn asset_id(symbol: &Symbol) -> String {
    symbol
        .known_coin()
        .map(|coin| coin.asset_id().to_string())
        .unwrap_or_else(|| symbol.as_str().to_ascii_lowercase())
}

impl QuoteProvider for DigitalAssetProvider {
    fn kind(&self) -> AssetKind {
        AssetKind::DigitalAsset
    }

    fn fetch(&self, symbol: &Symbol) -> Result<RawPayload, FetchError> {
        let id = asset_id(symbol);
        let price = self.transport.get_json(
            symbol.as_str(),
            &net::url(&self.base_url, "simple/price"),
            &[
                ("ids", id.as_str()),
                ("vs_currencies", self.currency.as_str()),
                ("include_24hr_change", "true"),
            ],
        )?;
        ensure_listed(symbol, &id, &price)?;

        let history_url = net::url(&self.base_url, &format!("coins/{id}/market_chart"));
        let chart = match self.transport.get_json(
            symbol.as_str(),
            &history_url,
            &[
                ("vs_currency", self.currency.as_str()),
                ("days", DIGITAL_ASSET_DAYS),
                ("interval", "daily"),
            ],
        ) {
            Ok(chart) => chart,
            Err(e) => {
                warn!("History for {} unavailable, showing price only: {}", symbol, e);
                Value::Null
            }
        };

        Ok(RawPayload::DigitalAsset {
            asset_id: id,
            currency: self.currency.clone(),
            price,
            chart,
        })
    }
}

/// Unknown ids come back as `{}` with status 200.
fn ensure_listed(symbol: &Symbol, id: &str, price: &Value) -> Result<(), FetchError> {
    match price.get(id) {
        Some(entry) if !entry.is_null() => Ok(()),
        _ => Err(FetchError::NotFound(symbol.to_string())),
    }
}
