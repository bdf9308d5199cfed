//! One full frame of the board, built from a fetch report.
//!
//! Every requested symbol gets a panel: a healthy one when both the retrieval and the
//! normalization succeeded, a degraded one otherwise. Failures are logged here and
//! never abort the frame.
use log::warn;
use price_common::config::Colors;
use price_common::{AssetKind, DisplayConfig, Symbol, downsample, normalize};
use price_fetch::{FetchOutcome, FetchReport};

use crate::error::RenderError;
use crate::view::{Block, Paint, StyledLine, compose, panel, sparkline};

/// Laid-out frame plus what went into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    lines: Vec<StyledLine>,
    panels: usize,
    resolved: usize,
}

impl Screen {
    /// Build the frame for `report`.
    ///
    /// Fails with `TooManyPanels` when the report holds more symbols than
    /// `max_tickers`.
    pub fn build(report: &FetchReport, config: &DisplayConfig) -> Result<Self, RenderError> {
        let max = config.display.max_tickers;
        if report.len() > max {
            return Err(RenderError::TooManyPanels {
                count: report.len(),
                max,
            });
        }

        let mut resolved = 0;
        let panels: Vec<Block> = report
            .entries()
            .iter()
            .map(|(symbol, kind, outcome)| {
                let (block, ok) = symbol_panel(symbol, *kind, outcome, config);
                resolved += usize::from(ok);
                block
            })
            .collect();

        Ok(Self {
            lines: compose(&panels, config.display.max_tickers_per_row),
            panels: panels.len(),
            resolved,
        })
    }

    /// Grid lines.
    pub fn lines(&self) -> &[StyledLine] {
        &self.lines
    }

    /// Panels drawn, healthy and degraded.
    pub fn panels(&self) -> usize {
        self.panels
    }

    /// Panels that show market data.
    pub fn resolved(&self) -> usize {
        self.resolved
    }

    /// Whole frame as terminal text, one trailing newline per line.
    pub fn render(&self, paint: &dyn Paint, colors: &Colors) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.paint(paint, colors));
            out.push('\n');
        }
        out
    }
}

/// Panel for one report entry, and whether it shows market data.
fn symbol_panel(
    symbol: &Symbol,
    kind: AssetKind,
    outcome: &FetchOutcome,
    config: &DisplayConfig,
) -> (Block, bool) {
    let raw = match outcome {
        Ok(raw) => raw,
        Err(e) => return (panel::degraded(symbol, kind, &e.to_string(), config), false),
    };

    match normalize(raw, kind, symbol) {
        Ok(quote) => {
            let series = downsample(quote.chart_history(), config.display.chart_width);
            let chart = sparkline::render(&series, config.display.chart_height);
            (panel::format(&quote, &chart, config), true)
        }
        Err(e) => {
            warn!("Cannot read market data for {}: {}", symbol, e);
            (panel::degraded(symbol, kind, &e.to_string(), config), false)
        }
    }
}
