//! Canonical quote model.
//!
//! A `Quote` is built once per fetch cycle from normalized provider data and never
//! mutated afterwards; the next cycle builds a fresh one. Derived fields (`change`,
//! `percent_change`, `direction`) are computed in the constructor so they can never
//! disagree with the prices they were derived from.

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};

use crate::error::NormalizeError;
use crate::tickers::{AssetKind, Symbol};

/// Span of history drawn as the sparkline, counted back from the newest point.
pub const CHART_DAYS: i64 = 90;

/// One historical observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    /// Observation time.
    pub timestamp: DateTime<Utc>,
    /// Price at `timestamp`.
    pub price: f64,
}

impl PricePoint {
    /// Build a point.
    pub fn new(timestamp: DateTime<Utc>, price: f64) -> Self {
        Self { timestamp, price }
    }
}

/// Sign of the change against the previous close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Price above the previous close.
    Up,
    /// Price below the previous close.
    Down,
    /// Price exactly equal to the previous close.
    Flat,
}

impl Direction {
    /// Direction of a signed change.
    pub fn of(change: f64) -> Self {
        if change > 0.0 {
            Direction::Up
        } else if change < 0.0 {
            Direction::Down
        } else {
            Direction::Flat
        }
    }
}

/// Relative change against the previous close.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PercentChange {
    /// `change / previous_close * 100`.
    Defined(f64),
    /// Previous close was zero; the change has no relative size.
    Undefined,
}

impl PercentChange {
    /// Numeric value, `0.0` when undefined.
    pub fn value(&self) -> f64 {
        match self {
            PercentChange::Defined(value) => *value,
            PercentChange::Undefined => 0.0,
        }
    }

    /// Whether the value had to be guarded.
    pub fn is_undefined(&self) -> bool {
        matches!(self, PercentChange::Undefined)
    }
}

/// Market snapshot for one instrument.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    symbol: Symbol,
    kind: AssetKind,
    price: f64,
    previous_close: f64,
    change: f64,
    percent_change: PercentChange,
    direction: Direction,
    history: Vec<PricePoint>,
}

impl Quote {
    /// Build a quote and its derived fields.
    ///
    /// `history` must be ascending by timestamp. Both prices must be finite and
    /// non-negative.
    pub fn new(
        symbol: Symbol,
        kind: AssetKind,
        price: f64,
        previous_close: f64,
        history: Vec<PricePoint>,
    ) -> Result<Self, NormalizeError> {
        validate_price("price", price)?;
        validate_price("previous_close", previous_close)?;

        let change = price - previous_close;
        let percent_change = if previous_close != 0.0 {
            let value = change / previous_close * 100.0;
            if value.is_finite() {
                PercentChange::Defined(value)
            } else {
                PercentChange::Undefined
            }
        } else {
            PercentChange::Undefined
        };

        Ok(Self {
            symbol,
            kind,
            price,
            previous_close,
            change,
            percent_change,
            direction: Direction::of(change),
            history,
        })
    }

    /// Instrument symbol.
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Instrument family.
    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    /// Current price.
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Reference price the change is measured against.
    pub fn previous_close(&self) -> f64 {
        self.previous_close
    }

    /// `price - previous_close`.
    pub fn change(&self) -> f64 {
        self.change
    }

    /// Relative change, guarded against a zero previous close.
    pub fn percent_change(&self) -> PercentChange {
        self.percent_change
    }

    /// Sign of `change`.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Ascending price history, possibly empty.
    pub fn history(&self) -> &[PricePoint] {
        &self.history
    }

    /// The last `CHART_DAYS` of history, the part the sparkline draws.
    pub fn chart_history(&self) -> &[PricePoint] {
        let Some(newest) = self.history.last().map(|p| p.timestamp) else {
            return &self.history;
        };
        let start = newest - Duration::days(CHART_DAYS);
        let first = self.history.partition_point(|p| p.timestamp < start);
        &self.history[first..]
    }

    /// Percent change of the current price against the last history point that is at
    /// least `days` older than the newest one.
    ///
    /// Returns `None` when the history does not reach back that far or the reference
    /// price is zero.
    pub fn change_over(&self, days: i64) -> Option<f64> {
        let latest = self.history.last()?.timestamp;
        let cutoff = latest - Duration::days(days);
        let reference = self
            .history
            .iter()
            .rev()
            .find(|point| point.timestamp <= cutoff)?;
        self.percent_against(reference.price)
    }

    /// Percent change of the current price against the first history point at or
    /// after `since`.
    pub fn change_since(&self, since: DateTime<Utc>) -> Option<f64> {
        let reference = self.history.iter().find(|point| point.timestamp >= since)?;
        self.percent_against(reference.price)
    }

    /// Year-to-date change: `change_since` the first of January of the year the
    /// newest history point falls in.
    pub fn ytd_change(&self) -> Option<f64> {
        let year = self.history.last()?.timestamp.year();
        let new_year = Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).single()?;
        self.change_since(new_year)
    }

    fn percent_against(&self, reference: f64) -> Option<f64> {
        if reference == 0.0 {
            return None;
        }
        Some((self.price - reference) / reference * 100.0)
    }
}

fn validate_price(field: &'static str, value: f64) -> Result<(), NormalizeError> {
    if !value.is_finite() {
        return Err(NormalizeError::InvalidValue {
            field,
            reason: format!("{value} is not a finite number"),
        });
    }
    if value < 0.0 {
        return Err(NormalizeError::InvalidValue {
            field,
            reason: format!("{value} is negative"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn symbol(s: &str) -> Symbol {
        Symbol::parse(s).expect("valid symbol")
    }

    fn day(n: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).single().expect("valid time") + Duration::days(n)
    }

    #[test]
    fn derived_fields_follow_prices() {
        let quote = Quote::new(symbol("AAPL"), AssetKind::Equity, 150.0, 148.5, Vec::new())
            .expect("valid quote");
        assert_relative_eq!(quote.change(), 1.5);
        assert_relative_eq!(quote.percent_change().value(), 1.5 / 148.5 * 100.0);
        assert_eq!(quote.direction(), Direction::Up);
    }

    #[test]
    fn zero_previous_close_is_guarded() {
        let quote = Quote::new(symbol("BTC"), AssetKind::DigitalAsset, 0.0, 0.0, Vec::new())
            .expect("valid quote");
        assert_eq!(quote.change(), 0.0);
        assert_eq!(quote.percent_change(), PercentChange::Undefined);
        assert_eq!(quote.percent_change().value(), 0.0);
        assert_eq!(quote.direction(), Direction::Flat);
    }

    #[test]
    fn negative_and_non_finite_prices_are_rejected() {
        let negative = Quote::new(symbol("X"), AssetKind::Equity, -1.0, 1.0, Vec::new());
        assert!(matches!(
            negative,
            Err(NormalizeError::InvalidValue { field: "price", .. })
        ));
        let nan = Quote::new(symbol("X"), AssetKind::Equity, 1.0, f64::NAN, Vec::new());
        assert!(matches!(
            nan,
            Err(NormalizeError::InvalidValue { field: "previous_close", .. })
        ));
    }

    #[test]
    fn change_over_uses_last_point_before_cutoff() {
        let history: Vec<PricePoint> = (0..40)
            .map(|n| PricePoint::new(day(n), 100.0 + n as f64))
            .collect();
        let quote = Quote::new(symbol("MSFT"), AssetKind::Equity, 140.0, 139.0, history)
            .expect("valid quote");

        // Newest point is day 39, so the 7-day reference is day 32 (price 132).
        assert_relative_eq!(
            quote.change_over(7).expect("in range"),
            (140.0 - 132.0) / 132.0 * 100.0
        );
        assert!(quote.change_over(60).is_none());
    }

    fn on(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
            .single()
            .expect("valid date")
    }

    #[test]
    fn ytd_change_starts_at_first_point_of_the_year() {
        let history = vec![
            PricePoint::new(on(2023, 12, 29), 90.0),
            PricePoint::new(on(2024, 1, 2), 100.0),
            PricePoint::new(on(2024, 2, 1), 110.0),
        ];
        let quote = Quote::new(symbol("SPY"), AssetKind::Equity, 120.0, 118.0, history)
            .expect("valid quote");

        assert_relative_eq!(quote.ytd_change().expect("has january point"), 20.0);
        assert_relative_eq!(quote.change_since(on(2023, 1, 1)).expect("in range"), 100.0 / 3.0);
    }

    #[test]
    fn ytd_change_is_undefined_without_a_usable_reference() {
        let empty = Quote::new(symbol("SPY"), AssetKind::Equity, 1.0, 1.0, Vec::new())
            .expect("valid quote");
        assert!(empty.ytd_change().is_none());

        let zero = vec![
            PricePoint::new(on(2024, 1, 2), 0.0),
            PricePoint::new(on(2024, 1, 3), 5.0),
        ];
        let zero = Quote::new(symbol("NEW"), AssetKind::Equity, 5.0, 5.0, zero)
            .expect("valid quote");
        assert!(zero.ytd_change().is_none());
    }

    #[test]
    fn chart_history_keeps_the_last_ninety_days() {
        let history: Vec<PricePoint> = (0..=200)
            .map(|n| PricePoint::new(day(n), n as f64))
            .collect();
        let quote = Quote::new(symbol("QQQ"), AssetKind::Equity, 1.0, 1.0, history)
            .expect("valid quote");

        assert_eq!(quote.history().len(), 201);
        let chart = quote.chart_history();
        assert_eq!(chart.len(), 91);
        assert_eq!(chart.first().map(|p| p.price), Some(110.0));
    }
}
