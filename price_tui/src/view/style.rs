//! Styled text model shared by the renderers.
//!
//! Renderers never emit escape codes themselves. They produce lines of spans tagged
//! with a `ColorRole`, and a `Paint` implementation turns those into terminal text
//! at the very end. Widths are counted in chars; every glyph used by the board is
//! single-width.
use colored::{Color, Colorize};
use price_common::ColorRole;
use price_common::config::Colors;

/// Run of text drawn in one role, or uncolored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// Color role, `None` for uncolored text.
    pub role: Option<ColorRole>,
    /// Text of the run.
    pub text: String,
}

impl Span {
    /// Uncolored text.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            role: None,
            text: text.into(),
        }
    }

    /// Text drawn in `role`.
    pub fn colored(role: ColorRole, text: impl Into<String>) -> Self {
        Self {
            role: Some(role),
            text: text.into(),
        }
    }

    fn width(&self) -> usize {
        self.text.chars().count()
    }
}

/// One terminal line made of spans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledLine {
    spans: Vec<Span>,
}

impl StyledLine {
    /// Empty line.
    pub fn new() -> Self {
        Self::default()
    }

    /// Line of `width` blanks.
    pub fn blank(width: usize) -> Self {
        let mut line = Self::new();
        line.push(Span::plain(" ".repeat(width)));
        line
    }

    /// Append a span, merging it into the previous one when the roles match.
    pub fn push(&mut self, span: Span) {
        if span.text.is_empty() {
            return;
        }
        match self.spans.last_mut() {
            Some(last) if last.role == span.role => last.text.push_str(&span.text),
            _ => self.spans.push(span),
        }
    }

    /// Append every span of `other`.
    pub fn extend(&mut self, other: StyledLine) {
        for span in other.spans {
            self.push(span);
        }
    }

    /// Spans in order.
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Width in chars.
    pub fn width(&self) -> usize {
        self.spans.iter().map(Span::width).sum()
    }

    /// Text without any styling.
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// Copy padded with blanks or truncated to exactly `width` chars.
    pub fn fit(&self, width: usize) -> Self {
        let mut out = Self::new();
        let mut remaining = width;
        for span in &self.spans {
            if remaining == 0 {
                break;
            }
            let taken: String = span.text.chars().take(remaining).collect();
            remaining -= taken.chars().count();
            out.push(Span {
                role: span.role,
                text: taken,
            });
        }
        if remaining > 0 {
            out.push(Span::plain(" ".repeat(remaining)));
        }
        out
    }

    /// Render with `paint`, resolving roles through `colors`.
    pub fn paint(&self, paint: &dyn Paint, colors: &Colors) -> String {
        let mut out = String::new();
        for span in &self.spans {
            match span.role {
                Some(role) if !span.text.trim().is_empty() => {
                    out.push_str(&paint.paint(&span.text, colors.get(role)))
                }
                _ => out.push_str(&span.text),
            }
        }
        out
    }
}

/// Rectangle of lines with a fixed width, the unit the grid lays out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    width: usize,
    lines: Vec<StyledLine>,
}

impl Block {
    /// Empty block of the given width.
    pub fn new(width: usize) -> Self {
        Self {
            width,
            lines: Vec::new(),
        }
    }

    /// Block of blanks.
    pub fn blank(width: usize, height: usize) -> Self {
        Self {
            width,
            lines: vec![StyledLine::blank(width); height],
        }
    }

    /// Append a line fitted to the block width.
    pub fn push(&mut self, line: StyledLine) {
        self.lines.push(line.fit(self.width));
    }

    /// Append blank lines until the block is `height` lines tall.
    pub fn pad_to(&mut self, height: usize) {
        while self.lines.len() < height {
            self.lines.push(StyledLine::blank(self.width));
        }
    }

    /// Width in chars.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of lines.
    pub fn height(&self) -> usize {
        self.lines.len()
    }

    /// Lines top to bottom.
    pub fn lines(&self) -> &[StyledLine] {
        &self.lines
    }
}

/// Turns a colored run into terminal text.
pub trait Paint {
    /// Draw `text` in `color`.
    fn paint(&self, text: &str, color: Color) -> String;
}

/// ANSI colors through `colored`: named colors or 24-bit ones.
pub struct AnsiPaint;

impl Paint for AnsiPaint {
    fn paint(&self, text: &str, color: Color) -> String {
        text.color(color).to_string()
    }
}

/// No escape codes at all.
pub struct PlainPaint;

impl Paint for PlainPaint {
    fn paint(&self, text: &str, _color: Color) -> String {
        text.to_string()
    }
}
