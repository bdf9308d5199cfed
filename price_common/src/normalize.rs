//! Quote normalizer: maps raw provider payloads onto the canonical `Quote`.
//!
//! Each provider family has a mapping table that lists, per canonical field, the
//! payload locations to try in order. Locations are JSON pointers; digital-asset
//! pointers are templates where `{id}` and `{currency}` are replaced by the asset
//! identifier and quote currency carried in the payload.
//!
//! Prices must be JSON numbers. A location holding `null` counts as absent; any
//! other non-numeric value, a negative or a non-finite number is rejected rather than
//! coerced.
//!
//! History is best effort: malformed points are dropped and a missing series simply
//! produces an empty history.

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

use crate::error::NormalizeError;
use crate::payload::RawPayload;
use crate::quote::{PricePoint, Quote};
use crate::tickers::{AssetKind, Symbol};

/// Length of the history window kept on a quote; a full year so year-to-date
/// changes have a reference point in January.
pub const HISTORY_DAYS: i64 = 366;

/// Where a canonical value can be found inside a payload document.
#[derive(Debug, Clone, Copy)]
enum Locator {
    /// Number at a JSON pointer.
    At(&'static str),
    /// Second-to-last number of the array at a JSON pointer.
    PenultimateOf(&'static str),
    /// Reference price backed out of a percent change against the current price.
    FromPercentChange(&'static str),
}

impl Locator {
    fn pointer(&self) -> &'static str {
        match self {
            Locator::At(p) | Locator::PenultimateOf(p) | Locator::FromPercentChange(p) => p,
        }
    }
}

/// Candidate locations for one canonical field.
#[derive(Debug, Clone, Copy)]
struct FieldRule {
    field: &'static str,
    sources: &'static [Locator],
}

/// Mapping from one provider shape to the canonical price fields.
#[derive(Debug, Clone, Copy)]
struct MappingTable {
    price: FieldRule,
    previous_close: FieldRule,
}

const EQUITY_FIELDS: MappingTable = MappingTable {
    price: FieldRule {
        field: "price",
        sources: &[Locator::At("/chart/result/0/meta/regularMarketPrice")],
    },
    previous_close: FieldRule {
        field: "previous_close",
        sources: &[
            Locator::At("/chart/result/0/meta/previousClose"),
            Locator::At("/chart/result/0/meta/regularMarketPreviousClose"),
            Locator::PenultimateOf("/chart/result/0/indicators/quote/0/close"),
        ],
    },
};

const DIGITAL_ASSET_FIELDS: MappingTable = MappingTable {
    price: FieldRule {
        field: "price",
        sources: &[Locator::At("/{id}/{currency}")],
    },
    previous_close: FieldRule {
        field: "previous_close",
        sources: &[Locator::FromPercentChange("/{id}/{currency}_24h_change")],
    },
};

const EQUITY_TIMESTAMPS: &str = "/chart/result/0/timestamp";
const EQUITY_CLOSES: &str = "/chart/result/0/indicators/quote/0/close";
const DIGITAL_ASSET_PRICES: &str = "/prices";

/// Convert a raw provider payload into a `Quote`.
///
/// `kind` must match the payload variant. Fails with `MissingField` when no
/// candidate location of a required field is present, and with `InvalidValue` when
/// a price is not a non-negative finite number.
pub fn normalize(
    raw: &RawPayload,
    kind: AssetKind,
    symbol: &Symbol,
) -> Result<Quote, NormalizeError> {
    if raw.kind() != kind {
        return Err(NormalizeError::KindMismatch {
            expected: kind,
            found: raw.kind(),
        });
    }

    match raw {
        RawPayload::Equity { chart } => {
            let fields = Resolver::new(chart, "", "");
            let price = fields.require(&EQUITY_FIELDS.price, None)?;
            let previous_close = fields.require(&EQUITY_FIELDS.previous_close, Some(price))?;
            let history = equity_history(chart);
            Quote::new(symbol.clone(), kind, price, previous_close, history)
        }
        RawPayload::DigitalAsset {
            asset_id,
            currency,
            price: price_doc,
            chart,
        } => {
            let fields = Resolver::new(price_doc, asset_id, currency);
            let price = fields.require(&DIGITAL_ASSET_FIELDS.price, None)?;
            let previous_close =
                fields.require(&DIGITAL_ASSET_FIELDS.previous_close, Some(price))?;
            let history = digital_asset_history(chart);
            Quote::new(symbol.clone(), kind, price, previous_close, history)
        }
    }
}

/// Resolves field rules against one document.
struct Resolver<'a> {
    doc: &'a Value,
    asset_id: &'a str,
    currency: &'a str,
}

impl<'a> Resolver<'a> {
    fn new(doc: &'a Value, asset_id: &'a str, currency: &'a str) -> Self {
        Self {
            doc,
            asset_id,
            currency,
        }
    }

    fn pointer(&self, template: &str) -> String {
        template
            .replace("{id}", &escape_pointer(self.asset_id))
            .replace("{currency}", &escape_pointer(self.currency))
    }

    /// First present candidate of `rule`; `price` is the already-resolved current
    /// price, needed by derived locators.
    fn require(&self, rule: &FieldRule, price: Option<f64>) -> Result<f64, NormalizeError> {
        for locator in rule.sources {
            if let Some(value) = self.locate(rule.field, *locator, price)? {
                return Ok(value);
            }
        }
        Err(NormalizeError::MissingField {
            field: rule.field,
            looked_at: rule
                .sources
                .iter()
                .map(|locator| self.pointer(locator.pointer()))
                .collect::<Vec<_>>()
                .join(", "),
        })
    }

    fn locate(
        &self,
        field: &'static str,
        locator: Locator,
        price: Option<f64>,
    ) -> Result<Option<f64>, NormalizeError> {
        let pointer = self.pointer(locator.pointer());
        let Some(value) = self.doc.pointer(&pointer).filter(|v| !v.is_null()) else {
            return Ok(None);
        };

        match locator {
            Locator::At(_) => price_value(field, value).map(Some),
            Locator::PenultimateOf(_) => {
                let numbers: Vec<f64> = value
                    .as_array()
                    .map(|items| items.iter().filter_map(Value::as_f64).collect())
                    .unwrap_or_default();
                match numbers.len() {
                    0 | 1 => Ok(None),
                    n => check_price(field, numbers[n - 2]).map(Some),
                }
            }
            Locator::FromPercentChange(_) => {
                let percent = value.as_f64().ok_or_else(|| NormalizeError::InvalidValue {
                    field,
                    reason: format!("percent change {value} is not a number"),
                })?;
                let Some(price) = price else {
                    return Ok(None);
                };
                let factor = 1.0 + percent / 100.0;
                if !factor.is_finite() || factor <= 0.0 {
                    return Err(NormalizeError::InvalidValue {
                        field,
                        reason: format!("cannot derive a reference price from {percent}% change"),
                    });
                }
                check_price(field, price / factor).map(Some)
            }
        }
    }
}

fn price_value(field: &'static str, value: &Value) -> Result<f64, NormalizeError> {
    let number = value.as_f64().ok_or_else(|| NormalizeError::InvalidValue {
        field,
        reason: format!("{value} is not a number"),
    })?;
    check_price(field, number)
}

fn check_price(field: &'static str, number: f64) -> Result<f64, NormalizeError> {
    if !number.is_finite() || number < 0.0 {
        return Err(NormalizeError::InvalidValue {
            field,
            reason: format!("{number} is not a non-negative price"),
        });
    }
    Ok(number)
}

fn escape_pointer(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

fn equity_history(chart: &Value) -> Vec<PricePoint> {
    let (Some(timestamps), Some(closes)) = (
        chart.pointer(EQUITY_TIMESTAMPS).and_then(Value::as_array),
        chart.pointer(EQUITY_CLOSES).and_then(Value::as_array),
    ) else {
        return Vec::new();
    };

    let points = timestamps
        .iter()
        .zip(closes)
        .filter_map(|(ts, close)| {
            let timestamp = DateTime::<Utc>::from_timestamp(ts.as_i64()?, 0)?;
            point(timestamp, close.as_f64()?)
        })
        .collect();
    tidy_history(points)
}

fn digital_asset_history(chart: &Value) -> Vec<PricePoint> {
    let Some(rows) = chart.pointer(DIGITAL_ASSET_PRICES).and_then(Value::as_array) else {
        return Vec::new();
    };

    let points = rows
        .iter()
        .filter_map(|row| {
            let pair = row.as_array()?;
            let millis = pair.first()?.as_f64()?;
            let timestamp = DateTime::<Utc>::from_timestamp_millis(millis as i64)?;
            point(timestamp, pair.get(1)?.as_f64()?)
        })
        .collect();
    tidy_history(points)
}

fn point(timestamp: DateTime<Utc>, price: f64) -> Option<PricePoint> {
    (price.is_finite() && price >= 0.0).then_some(PricePoint::new(timestamp, price))
}

/// Sort ascending, keep the last observation per timestamp and trim to the history
/// window ending at the newest point.
fn tidy_history(mut points: Vec<PricePoint>) -> Vec<PricePoint> {
    points.sort_by_key(|p| p.timestamp);
    let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
    for p in points {
        match deduped.last_mut() {
            Some(last) if last.timestamp == p.timestamp => *last = p,
            _ => deduped.push(p),
        }
    }

    if let Some(newest) = deduped.last().map(|p| p.timestamp) {
        let start = newest - Duration::days(HISTORY_DAYS);
        deduped.retain(|p| p.timestamp >= start);
    }
    deduped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::{Direction, PercentChange};
    use approx::assert_relative_eq;
    use serde_json::json;

    fn symbol(s: &str) -> Symbol {
        Symbol::parse(s).expect("valid symbol")
    }

    fn equity_chart(meta: Value, timestamps: Value, closes: Value) -> RawPayload {
        RawPayload::Equity {
            chart: json!({
                "chart": {
                    "result": [{
                        "meta": meta,
                        "timestamp": timestamps,
                        "indicators": {"quote": [{"close": closes}]}
                    }],
                    "error": null
                }
            }),
        }
    }

    fn coin(price: Value, chart: Value) -> RawPayload {
        RawPayload::DigitalAsset {
            asset_id: String::from("bitcoin"),
            currency: String::from("usd"),
            price,
            chart,
        }
    }

    #[test]
    fn equity_meta_fields_map_to_quote() {
        let raw = equity_chart(
            json!({"regularMarketPrice": 150.0, "previousClose": 148.5}),
            json!([1_700_000_000, 1_700_086_400]),
            json!([147.0, 150.0]),
        );
        let quote = normalize(&raw, AssetKind::Equity, &symbol("AAPL")).expect("normalizes");

        assert_relative_eq!(quote.price(), 150.0);
        assert_relative_eq!(quote.previous_close(), 148.5);
        assert_relative_eq!(quote.change(), 1.5);
        assert_eq!(quote.direction(), Direction::Up);
        assert_eq!(quote.history().len(), 2);
    }

    #[test]
    fn equity_previous_close_falls_back_to_penultimate_close() {
        let raw = equity_chart(
            json!({"regularMarketPrice": 99.0, "chartPreviousClose": 50.0}),
            json!([1_700_000_000, 1_700_086_400, 1_700_172_800]),
            json!([101.0, 100.0, 99.0]),
        );
        let quote = normalize(&raw, AssetKind::Equity, &symbol("MSFT")).expect("normalizes");
        assert_relative_eq!(quote.previous_close(), 100.0);
        assert_eq!(quote.direction(), Direction::Down);
    }

    #[test]
    fn missing_price_is_reported_not_zeroed() {
        let raw = equity_chart(json!({"previousClose": 10.0}), json!([]), json!([]));
        let err = normalize(&raw, AssetKind::Equity, &symbol("IBM")).expect_err("missing price");
        assert!(matches!(err, NormalizeError::MissingField { field: "price", .. }));
    }

    #[test]
    fn null_price_counts_as_missing() {
        let raw = equity_chart(
            json!({"regularMarketPrice": null, "previousClose": 10.0}),
            json!([]),
            json!([]),
        );
        let err = normalize(&raw, AssetKind::Equity, &symbol("IBM")).expect_err("missing price");
        assert!(matches!(err, NormalizeError::MissingField { field: "price", .. }));
    }

    #[test]
    fn non_numeric_and_negative_prices_are_invalid() {
        let text = equity_chart(
            json!({"regularMarketPrice": "150.00", "previousClose": 10.0}),
            json!([]),
            json!([]),
        );
        assert!(matches!(
            normalize(&text, AssetKind::Equity, &symbol("IBM")),
            Err(NormalizeError::InvalidValue { field: "price", .. })
        ));

        let negative = equity_chart(
            json!({"regularMarketPrice": 10.0, "previousClose": -1.0}),
            json!([]),
            json!([]),
        );
        assert!(matches!(
            normalize(&negative, AssetKind::Equity, &symbol("IBM")),
            Err(NormalizeError::InvalidValue { field: "previous_close", .. })
        ));
    }

    #[test]
    fn digital_asset_reference_is_derived_from_24h_change() {
        let raw = coin(
            json!({"bitcoin": {"usd": 110.0, "usd_24h_change": 10.0}}),
            json!({"prices": [[1_700_000_000_000_i64, 100.0], [1_700_086_400_000_i64, 110.0]]}),
        );
        let quote = normalize(&raw, AssetKind::DigitalAsset, &symbol("BTC")).expect("normalizes");

        assert_relative_eq!(quote.previous_close(), 100.0, epsilon = 1e-9);
        assert_relative_eq!(quote.percent_change().value(), 10.0, epsilon = 1e-9);
        assert_eq!(quote.history().len(), 2);
    }

    #[test]
    fn digital_asset_zero_price_is_flat_and_guarded() {
        let raw = coin(json!({"bitcoin": {"usd": 0.0, "usd_24h_change": 0.0}}), Value::Null);
        let quote = normalize(&raw, AssetKind::DigitalAsset, &symbol("BTC")).expect("normalizes");

        assert_eq!(quote.change(), 0.0);
        assert_eq!(quote.percent_change(), PercentChange::Undefined);
        assert_eq!(quote.direction(), Direction::Flat);
        assert!(quote.history().is_empty());
    }

    #[test]
    fn digital_asset_without_change_field_is_missing_previous_close() {
        let raw = coin(json!({"bitcoin": {"usd": 1.0}}), Value::Null);
        assert!(matches!(
            normalize(&raw, AssetKind::DigitalAsset, &symbol("BTC")),
            Err(NormalizeError::MissingField { field: "previous_close", .. })
        ));
    }

    #[test]
    fn total_loss_cannot_produce_a_reference_price() {
        let raw = coin(json!({"bitcoin": {"usd": 1.0, "usd_24h_change": -100.0}}), Value::Null);
        assert!(matches!(
            normalize(&raw, AssetKind::DigitalAsset, &symbol("BTC")),
            Err(NormalizeError::InvalidValue { field: "previous_close", .. })
        ));
    }

    #[test]
    fn mismatched_kind_is_rejected() {
        let raw = coin(json!({}), Value::Null);
        assert!(matches!(
            normalize(&raw, AssetKind::Equity, &symbol("BTC")),
            Err(NormalizeError::KindMismatch { .. })
        ));
    }

    #[test]
    fn history_is_sorted_deduplicated_and_trimmed() {
        let day = 86_400_i64;
        let newest = 1_700_000_000_i64;
        let raw = equity_chart(
            json!({"regularMarketPrice": 5.0, "previousClose": 4.0}),
            json!([
                newest,
                newest - 400 * day,
                newest - 200 * day,
                newest - day,
                newest - day,
                newest - 2 * day
            ]),
            json!([5.0, 1.0, 2.0, 3.0, 4.0, null]),
        );
        let quote = normalize(&raw, AssetKind::Equity, &symbol("T")).expect("normalizes");
        let prices: Vec<f64> = quote.history().iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![2.0, 4.0, 5.0]);

        let charted: Vec<f64> = quote.chart_history().iter().map(|p| p.price).collect();
        assert_eq!(charted, vec![4.0, 5.0]);
    }
}
