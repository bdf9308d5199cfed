//! Quote panels.
//!
//! A panel is a bordered block titled with the asset kind. Healthy panels show the
//! symbol and price, the change line, the 7d/30d and year-to-date figures (unless
//! `show_period_changes` is off) and the sparkline.
//! Degraded panels replace everything below the header with the error text and are
//! padded to the same height, so a grid never goes ragged because one symbol failed.
use price_common::{AssetKind, ColorRole, Direction, DisplayConfig, PercentChange, Quote, Symbol};

use super::style::{Block, Span, StyledLine};

/// Narrowest inner width a panel is drawn at.
pub const MIN_INNER_WIDTH: usize = 24;

/// Day counts on the first period line; the second holds the year-to-date figure.
const PERIODS: [i64; 2] = [7, 30];

/// Rows taken by the period figures when shown.
const PERIOD_ROWS: usize = 2;

/// Inner width for `config`.
pub fn inner_width(config: &DisplayConfig) -> usize {
    config.display.chart_width.max(MIN_INNER_WIDTH)
}

/// Total height of any panel drawn with `config`, borders included.
pub fn panel_height(config: &DisplayConfig) -> usize {
    let period = if config.display.show_period_changes {
        PERIOD_ROWS
    } else {
        0
    };
    2 + 2 + period + config.display.chart_height
}

/// Panel for a successfully normalized quote.
pub fn format(quote: &Quote, chart_rows: &[StyledLine], config: &DisplayConfig) -> Block {
    let inner = inner_width(config);
    let currency = config.currency.symbol.as_str();
    let decimals = decimals(quote.price(), quote.kind());

    let mut body = vec![header(
        quote.symbol(),
        Span::colored(ColorRole::Price, format_price(quote.price(), quote.kind(), currency)),
        inner,
    )];

    let (glyph, role) = match quote.direction() {
        Direction::Up => (&config.symbols.up, ColorRole::Positive),
        Direction::Down => (&config.symbols.down, ColorRole::Negative),
        Direction::Flat => (&config.symbols.flat, ColorRole::Neutral),
    };
    let percent = match quote.percent_change() {
        PercentChange::Defined(value) => format!("({value:+.2}%)"),
        PercentChange::Undefined => String::from("(n/a)"),
    };
    let mut change = StyledLine::new();
    change.push(Span::colored(
        role,
        format!(
            "{glyph} {} {percent}",
            group_thousands(quote.change().abs(), decimals)
        ),
    ));
    body.push(change);

    if config.display.show_period_changes {
        body.extend(period_lines(quote));
    }
    body.extend(chart_rows.iter().cloned());

    frame(quote.kind(), body, inner, panel_height(config))
}

/// Panel for a symbol that could not be shown.
pub fn degraded(symbol: &Symbol, kind: AssetKind, message: &str, config: &DisplayConfig) -> Block {
    let inner = inner_width(config);
    let height = panel_height(config);

    let mut body = vec![header(symbol, Span::colored(ColorRole::Negative, "ERROR"), inner)];
    for text in wrap(message, inner).into_iter().take(height.saturating_sub(3)) {
        let mut line = StyledLine::new();
        line.push(Span::colored(ColorRole::Neutral, text));
        body.push(line);
    }

    frame(kind, body, inner, height)
}

/// Price with currency prefix, thousands separators and kind-dependent precision.
pub fn format_price(value: f64, kind: AssetKind, currency_symbol: &str) -> String {
    format!(
        "{currency_symbol}{}",
        group_thousands(value, decimals(value, kind))
    )
}

fn decimals(value: f64, kind: AssetKind) -> usize {
    match kind {
        AssetKind::Equity => 2,
        AssetKind::DigitalAsset if value >= 1.0 => 2,
        AssetKind::DigitalAsset if value >= 0.0001 => 4,
        AssetKind::DigitalAsset => 8,
    }
}

fn group_thousands(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    if value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        grouped.insert(0, '-');
    }
    grouped
}

/// Symbol on the left, `right` flush right. A symbol that would push `right` past
/// the border is cut and ends in `…`.
fn header(symbol: &Symbol, right: Span, inner: usize) -> StyledLine {
    let room = inner.saturating_sub(right.text.chars().count() + 1);
    let left: String = if symbol.as_str().chars().count() > room {
        let mut cut: String = symbol.as_str().chars().take(room.saturating_sub(1)).collect();
        if room > 0 {
            cut.push('…');
        }
        cut
    } else {
        symbol.to_string()
    };
    let used = left.chars().count() + right.text.chars().count();
    let gap = inner.saturating_sub(used).max(1);

    let mut line = StyledLine::new();
    line.push(Span::colored(ColorRole::Ticker, left));
    line.push(Span::plain(" ".repeat(gap)));
    line.push(right);
    line
}

fn period_lines(quote: &Quote) -> [StyledLine; PERIOD_ROWS] {
    let mut days = StyledLine::new();
    for (i, span) in PERIODS.iter().enumerate() {
        if i > 0 {
            days.push(Span::plain("  "));
        }
        figure(&mut days, &format!("{span}d"), quote.change_over(*span));
    }

    let mut ytd = StyledLine::new();
    figure(&mut ytd, "YTD", quote.ytd_change());
    [days, ytd]
}

fn figure(line: &mut StyledLine, label: &str, value: Option<f64>) {
    line.push(Span::plain(format!("{label} ")));
    match value {
        Some(value) => {
            let role = match Direction::of(value) {
                Direction::Up => ColorRole::Positive,
                Direction::Down => ColorRole::Negative,
                Direction::Flat => ColorRole::Neutral,
            };
            line.push(Span::colored(role, format!("{value:+.2}%")));
        }
        None => line.push(Span::colored(ColorRole::Neutral, "--")),
    }
}

fn frame(kind: AssetKind, body: Vec<StyledLine>, inner: usize, height: usize) -> Block {
    let title = kind.to_string();
    let fill = (inner + 4).saturating_sub(5 + title.chars().count());

    let mut block = Block::new(inner + 4);
    let mut top = StyledLine::new();
    top.push(Span::plain(format!("┌─ {title} {}┐", "─".repeat(fill))));
    block.push(top);

    let rows = height.saturating_sub(2);
    for line in body
        .into_iter()
        .chain(std::iter::repeat_with(StyledLine::new))
        .take(rows)
    {
        let mut framed = StyledLine::new();
        framed.push(Span::plain("│ "));
        framed.extend(line.fit(inner));
        framed.push(Span::plain(" │"));
        block.push(framed);
    }

    let mut bottom = StyledLine::new();
    bottom.push(Span::plain(format!("└{}┘", "─".repeat(inner + 2))));
    block.push(bottom);
    block
}

/// Greedy word wrap; words wider than `width` are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            lines.push(word.drain(..width).collect());
        }
        let word: String = word.into_iter().collect();
        let needed =
            current.chars().count() + usize::from(!current.is_empty()) + word.chars().count();
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !word.is_empty() {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
