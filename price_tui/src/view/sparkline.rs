//! Bucketed series to a block-glyph chart.
use price_common::{BucketedSeries, ColorRole};

use super::style::{Span, StyledLine};

/// Glyph drawn for the one filled cell of each column.
pub const FILLED: char = '█';

/// Draw `series` as `height` rows, top row first, one column per bucket.
///
/// Each column has exactly one filled cell at the row matching its relative value
/// (row 0 is the bottom). A flat series sits at `height / 2`. Column 0 is neutral;
/// every other column is colored by comparison with the bucket before it.
pub fn render(series: &BucketedSeries, height: usize) -> Vec<StyledLine> {
    if height == 0 {
        return Vec::new();
    }

    let buckets = series.buckets();
    let range = series.max() - series.min();
    let levels: Vec<usize> = buckets
        .iter()
        .map(|&value| {
            if range > 0.0 {
                let scaled = (value - series.min()) / range * (height - 1) as f64;
                (scaled.round() as usize).min(height - 1)
            } else {
                height / 2
            }
        })
        .collect();
    let roles: Vec<ColorRole> = buckets
        .iter()
        .enumerate()
        .map(|(i, &value)| match i.checked_sub(1).map(|p| buckets[p]) {
            Some(previous) if value > previous => ColorRole::Positive,
            Some(previous) if value < previous => ColorRole::Negative,
            _ => ColorRole::Neutral,
        })
        .collect();

    (0..height)
        .rev()
        .map(|row| {
            let mut line = StyledLine::new();
            for (level, role) in levels.iter().zip(&roles) {
                if *level == row {
                    line.push(Span::colored(*role, FILLED.to_string()));
                } else {
                    line.push(Span::plain(" "));
                }
            }
            line
        })
        .collect()
}
