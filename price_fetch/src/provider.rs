//! Provider seam and the shared HTTP transport.
//!
//! Every market data source implements `QuoteProvider`: one blocking retrieval per
//! symbol, returning the untouched provider documents as a `RawPayload`. The
//! orchestrator only sees this trait, so tests swap real providers for stubs.
//!
//! `HttpTransport` wraps a blocking `reqwest` client configured with the common
//! timeout and user agent, and maps HTTP outcomes onto `FetchError`:
//! - 404 becomes `NotFound` for the requested symbol,
//! - 429 becomes `RateLimited` for the provider,
//! - any other failure (transport, status, undecodable body) becomes `Network`.
use log::debug;
use price_common::{AssetKind, FetchError, PriceError, RawPayload, Symbol};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Instant;

use crate::net::{REQUEST_TIMEOUT, USER_AGENT};

/// A market data source for one family of instruments.
pub trait QuoteProvider: Send + Sync {
    /// Instrument family this provider serves.
    fn kind(&self) -> AssetKind;

    /// Retrieve the raw documents for `symbol`.
    fn fetch(&self, symbol: &Symbol) -> Result<RawPayload, FetchError>;
}

/// Blocking JSON-over-HTTP client shared by the concrete providers.
pub struct HttpTransport {
    client: Client,
    provider: &'static str,
}

impl HttpTransport {
    /// Build a transport; `provider` names the upstream in error messages.
    pub fn new(provider: &'static str) -> Result<Self, PriceError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                FetchError::Network(format!("{provider}: cannot build HTTP client: {e}"))
            })?;
        Ok(Self { client, provider })
    }

    /// GET `url` with `query` and decode the body as JSON.
    ///
    /// `subject` is the symbol reported by a `NotFound`.
    pub fn get_json(
        &self,
        subject: &str,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<Value, FetchError> {
        let started = Instant::now();
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .map_err(|e| FetchError::Network(format!("{}: {e}", self.provider)))?;
        let status = response.status();
        debug!(
            "GET {} {:?} -> {} in {:?}",
            url,
            query,
            status,
            started.elapsed()
        );

        classify_status(status, subject, self.provider)?;
        response
            .json::<Value>()
            .map_err(|e| FetchError::Network(format!("{}: unreadable body: {e}", self.provider)))
    }
}

/// Map an HTTP status onto the fetch failure taxonomy.
pub fn classify_status(
    status: StatusCode,
    subject: &str,
    provider: &str,
) -> Result<(), FetchError> {
    match status {
        s if s.is_success() => Ok(()),
        StatusCode::NOT_FOUND => Err(FetchError::NotFound(subject.to_string())),
        StatusCode::TOO_MANY_REQUESTS => Err(FetchError::RateLimited(provider.to_string())),
        other => Err(FetchError::Network(format!(
            "{provider}: unexpected status {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_map_onto_failure_classes() {
        assert_eq!(classify_status(StatusCode::OK, "AAPL", "yahoo"), Ok(()));
        assert_eq!(
            classify_status(StatusCode::NOT_FOUND, "ZZZZ", "yahoo"),
            Err(FetchError::NotFound("ZZZZ".into()))
        );
        assert_eq!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, "BTC", "coingecko"),
            Err(FetchError::RateLimited("coingecko".into()))
        );
        assert!(matches!(
            classify_status(StatusCode::BAD_GATEWAY, "AAPL", "yahoo"),
            Err(FetchError::Network(msg)) if msg.contains("502")
        ));
    }
}
