//! Provider endpoints and HTTP client settings.
use std::time::Duration;

/// Equity chart endpoint, the symbol is appended as a path segment.
pub const EQUITY_CHART_BASE: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
/// Digital-asset API root.
pub const DIGITAL_ASSET_BASE: &str = "https://api.coingecko.com/api/v3";

/// Per-request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("price-board/", env!("CARGO_PKG_VERSION"));

/// Equity history window requested from the chart endpoint; a year covers the
/// year-to-date reference.
pub const EQUITY_RANGE: &str = "1y";
/// Equity sampling interval.
pub const EQUITY_INTERVAL: &str = "1d";
/// Digital-asset history window in days.
pub const DIGITAL_ASSET_DAYS: &str = "365";

/// Join a base URL and a path like "base/path".
pub fn url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
