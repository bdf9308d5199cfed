//! Equity provider backed by the Yahoo v8 chart endpoint.
//!
//! The symbol becomes a path segment, so index and futures symbols (`^GSPC`,
//! `GC=F`) are percent-encoded before they are joined onto the base URL.
use price_common::{AssetKind, FetchError, PriceError, RawPayload, Symbol};
use serde_json::Value;

use crate::net::{self, EQUITY_CHART_BASE, EQUITY_INTERVAL, EQUITY_RANGE};
use crate::provider::{HttpTransport, QuoteProvider};

/// Fetches the daily chart document for a listed symbol.
pub struct EquityProvider {
    transport: HttpTransport,
    base_url: String,
}

impl EquityProvider {
    /// Provider against the public endpoint.
    pub fn new() -> Result<Self, PriceError> {
        Self::with_base_url(EQUITY_CHART_BASE)
    }

    /// Provider against another chart endpoint with the same shape.
    pub fn with_base_url(base_url: &str) -> Result<Self, PriceError> {
        Ok(Self {
            transport: HttpTransport::new("yahoo")?,
            base_url: base_url.to_string(),
        })
    }

    /// Chart URL for `symbol`.
    pub fn chart_url(&self, symbol: &Symbol) -> String {
        net::url(&self.base_url, &urlencoding::encode(symbol.as_str()))
    }
}

impl QuoteProvider for EquityProvider {
    fn kind(&self) -> AssetKind {
        AssetKind::Equity
    }

    fn fetch(&self, symbol: &Symbol) -> Result<RawPayload, FetchError> {
        let url = self.chart_url(symbol);
        let chart = self.transport.get_json(
            symbol.as_str(),
            &url,
            &[("range", EQUITY_RANGE), ("interval", EQUITY_INTERVAL)],
        )?;
        check_chart(symbol, &chart)?;
        Ok(RawPayload::Equity { chart })
    }
}

/// The chart endpoint can answer 200 with an error object or an empty result.
fn check_chart(symbol: &Symbol, chart: &Value) -> Result<(), FetchError> {
    if let Some(error) = chart.pointer("/chart/error").filter(|e| !e.is_null()) {
        let code = error.get("code").and_then(Value::as_str).unwrap_or_default();
        if code.eq_ignore_ascii_case("not found") {
            return Err(FetchError::NotFound(symbol.to_string()));
        }
        let description = error
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or(code);
        return Err(FetchError::Network(format!("yahoo: {description}")));
    }

    match chart.pointer("/chart/result") {
        Some(Value::Array(results)) if !results.is_empty() => Ok(()),
        _ => Err(FetchError::NotFound(symbol.to_string())),
    }
}
