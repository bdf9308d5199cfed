//! History downsampler.
//!
//! Turns an ascending price history into a fixed number of equal-duration time
//! buckets. Each bucket holds the price of the last point that falls into it; empty
//! buckets carry the previous bucket forward, and leading empty buckets take the
//! first available price. The output always has exactly `target_width` buckets.

use crate::quote::PricePoint;

/// Fixed-width price series ready for charting.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketedSeries {
    buckets: Vec<f64>,
    min: f64,
    max: f64,
}

impl BucketedSeries {
    /// Bucket values, oldest first.
    pub fn buckets(&self) -> &[f64] {
        &self.buckets
    }

    /// Smallest bucket value.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Largest bucket value.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Whether the series has no buckets (only for a zero target width).
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    fn from_buckets(buckets: Vec<f64>) -> Self {
        let (min, max) = match buckets.first() {
            None => (0.0, 0.0),
            Some(&first) => buckets
                .iter()
                .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
        };
        Self { buckets, min, max }
    }
}

/// Downsample `points` into `target_width` buckets.
///
/// An empty history yields `target_width` zeros. A history whose points all share
/// one timestamp yields `target_width` copies of the last price.
pub fn downsample(points: &[PricePoint], target_width: usize) -> BucketedSeries {
    let Some(first) = points.first() else {
        return BucketedSeries::from_buckets(vec![0.0; target_width]);
    };
    if target_width == 0 {
        return BucketedSeries::from_buckets(Vec::new());
    }

    let millis: Vec<i64> = points.iter().map(|p| p.timestamp.timestamp_millis()).collect();
    let start = millis.iter().copied().min().unwrap_or_default();
    let end = millis.iter().copied().max().unwrap_or_default();
    let span = i128::from(end) - i128::from(start);

    if span == 0 {
        let last = points.last().map_or(first.price, |p| p.price);
        return BucketedSeries::from_buckets(vec![last; target_width]);
    }

    let mut slots: Vec<Option<f64>> = vec![None; target_width];
    let width = target_width as i128;
    for (point, ts) in points.iter().zip(&millis) {
        let offset = i128::from(*ts) - i128::from(start);
        let index = ((offset * width) / span).min(width - 1) as usize;
        slots[index] = Some(point.price);
    }

    let mut carry = slots.iter().flatten().copied().next().unwrap_or(first.price);
    let buckets = slots
        .into_iter()
        .map(|slot| {
            if let Some(value) = slot {
                carry = value;
            }
            carry
        })
        .collect();
    BucketedSeries::from_buckets(buckets)
}
