//! Display configuration loaded from a JSON file.
//!
//! The file has four optional sections (`colors`, `display`, `symbols`, `currency`).
//! Every key falls back to a built-in default when missing; unknown keys are ignored.
//! Values that are present but unusable (unknown colors, zero sizes, empty glyphs,
//! or a JSON type the key does not take) are replaced by their defaults and reported
//! through `log::warn!`. Colors are `#RRGGBB` or a terminal color name.
//!
//! Loading is a two-step process: `ConfigFile` mirrors the file verbatim with every
//! field optional, and `resolve` turns it into the validated, immutable
//! `DisplayConfig` that the rest of the program borrows.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use colored::Color;
use log::{debug, warn};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ConfigError;

/// Path used when no `--config` flag is given.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Semantic color roles used by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorRole {
    /// Rising values.
    Positive,
    /// Falling values.
    Negative,
    /// Unchanged values and neutral chrome.
    Neutral,
    /// Instrument symbol.
    Ticker,
    /// Current price.
    Price,
}

/// 24-bit terminal color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Build a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (the leading `#` is optional).
    pub fn parse_hex(input: &str) -> Option<Self> {
        let hex = input.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::TrueColor {
            r: rgb.r,
            g: rgb.g,
            b: rgb.b,
        }
    }
}

/// Color assigned to each semantic role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Colors {
    /// Rising values.
    pub positive: Color,
    /// Falling values.
    pub negative: Color,
    /// Unchanged values.
    pub neutral: Color,
    /// Instrument symbol.
    pub ticker: Color,
    /// Current price.
    pub price: Color,
}

impl Colors {
    /// Color for a semantic role.
    pub fn get(&self, role: ColorRole) -> Color {
        match role {
            ColorRole::Positive => self.positive,
            ColorRole::Negative => self.negative,
            ColorRole::Neutral => self.neutral,
            ColorRole::Ticker => self.ticker,
            ColorRole::Price => self.price,
        }
    }
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            positive: Rgb::new(0x00, 0xFF, 0x00).into(),
            negative: Rgb::new(0xFF, 0x00, 0x00).into(),
            neutral: Rgb::new(0xFF, 0xFF, 0xFF).into(),
            ticker: Rgb::new(0x00, 0xFF, 0xFF).into(),
            price: Rgb::new(0xFF, 0xFF, 0xFF).into(),
        }
    }
}

/// Layout limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplaySettings {
    /// Panels per grid row; never greater than `max_tickers`.
    pub max_tickers_per_row: usize,
    /// Maximum number of instruments on screen.
    pub max_tickers: usize,
    /// Sparkline height in rows.
    pub chart_height: usize,
    /// Sparkline width in columns (buckets).
    pub chart_width: usize,
    /// Show the 7d/30d/YTD line under the change line.
    pub show_period_changes: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            max_tickers_per_row: 4,
            max_tickers: 12,
            chart_height: 8,
            chart_width: 20,
            show_period_changes: true,
        }
    }
}

/// Direction glyphs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbols {
    /// Marker for rising prices.
    pub up: String,
    /// Marker for falling prices.
    pub down: String,
    /// Marker for unchanged prices.
    pub flat: String,
}

impl Default for Symbols {
    fn default() -> Self {
        Self {
            up: String::from("▲"),
            down: String::from("▼"),
            flat: String::from("•"),
        }
    }
}

/// Currency used for provider queries and price display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Currency {
    /// Uppercase code such as `USD`, sent to providers in lowercase.
    pub default: String,
    /// Display glyph placed before prices.
    pub symbol: String,
}

impl Currency {
    /// Code in the form the digital-asset provider expects.
    pub fn query_code(&self) -> String {
        self.default.to_ascii_lowercase()
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self {
            default: String::from("USD"),
            symbol: String::from("$"),
        }
    }
}

/// Process-wide display configuration; immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Role colors.
    pub colors: Colors,
    /// Layout limits.
    pub display: DisplaySettings,
    /// Direction glyphs.
    pub symbols: Symbols,
    /// Currency settings.
    pub currency: Currency,
}

/// Verbatim shape of the configuration file.
///
/// Sections and leaves stay untyped so that a value of the wrong JSON type only
/// costs that one key, never the whole file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    colors: Value,
    display: Value,
    symbols: Value,
    currency: Value,
}

impl DisplayConfig {
    /// Load the configuration.
    ///
    /// With an explicit path, a missing or malformed file is an error. Without one,
    /// `DEFAULT_CONFIG_PATH` is used when it exists; problems with it are logged and
    /// the built-in defaults are returned instead.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::read(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_PATH);
                if !path.is_file() {
                    debug!("No {} found, using default configuration", DEFAULT_CONFIG_PATH);
                    return Ok(Self::default());
                }
                match Self::read(path) {
                    Ok(config) => Ok(config),
                    Err(e) => {
                        warn!("Error loading config: {}. Using default configuration", e);
                        Ok(Self::default())
                    }
                }
            }
        }
    }

    /// Read and resolve a configuration file.
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: ConfigFile =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        let (config, warnings) = resolve(file);
        for warning in &warnings {
            warn!("{}: {}", path.display(), warning);
        }
        Ok(config)
    }

    /// Parse configuration JSON held in memory, ignoring validation warnings.
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        let file: ConfigFile = serde_json::from_str(text)?;
        Ok(resolve(file).0)
    }
}

/// One top-level section; a non-object section is reported and treated as empty.
struct Section<'a> {
    name: &'static str,
    entries: Option<&'a Map<String, Value>>,
}

impl<'a> Section<'a> {
    fn new(name: &'static str, value: &'a Value, warnings: &mut Vec<String>) -> Self {
        let entries = match value {
            Value::Null => None,
            Value::Object(map) => Some(map),
            other => {
                warnings.push(format!("{name} must be an object, got {other}; using defaults"));
                None
            }
        };
        Self { name, entries }
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.entries
            .and_then(|map| map.get(key))
            .filter(|value| !value.is_null())
    }

    fn text(&self, key: &str, warnings: &mut Vec<String>) -> Option<&'a str> {
        match self.get(key)? {
            Value::String(text) => Some(text.as_str()),
            other => {
                warnings.push(format!(
                    "{}.{key} must be a string, got {other}; using default",
                    self.name
                ));
                None
            }
        }
    }
}

/// Turn the verbatim file into a validated configuration plus the list of
/// substitutions that were made.
pub fn resolve(file: ConfigFile) -> (DisplayConfig, Vec<String>) {
    let mut warnings = Vec::new();
    let defaults = DisplayConfig::default();

    let section = Section::new("colors", &file.colors, &mut warnings);
    let c = &defaults.colors;
    let colors = Colors {
        positive: color(&section, "positive", c.positive, &mut warnings),
        negative: color(&section, "negative", c.negative, &mut warnings),
        neutral: color(&section, "neutral", c.neutral, &mut warnings),
        ticker: color(&section, "ticker", c.ticker, &mut warnings),
        price: color(&section, "price", c.price, &mut warnings),
    };

    let section = Section::new("display", &file.display, &mut warnings);
    let d = &defaults.display;
    let max_tickers = size(&section, "max_tickers", d.max_tickers, &mut warnings);
    let mut max_tickers_per_row = size(
        &section,
        "max_tickers_per_row",
        d.max_tickers_per_row,
        &mut warnings,
    );
    if max_tickers_per_row > max_tickers {
        warnings.push(format!(
            "display.max_tickers_per_row ({max_tickers_per_row}) exceeds \
             max_tickers ({max_tickers}), clamping"
        ));
        max_tickers_per_row = max_tickers;
    }
    let display = DisplaySettings {
        max_tickers_per_row,
        max_tickers,
        chart_height: size(&section, "chart_height", d.chart_height, &mut warnings),
        chart_width: size(&section, "chart_width", d.chart_width, &mut warnings),
        show_period_changes: flag(
            &section,
            "show_period_changes",
            d.show_period_changes,
            &mut warnings,
        ),
    };

    let section = Section::new("symbols", &file.symbols, &mut warnings);
    let s = &defaults.symbols;
    let symbols = Symbols {
        up: glyph(&section, "up", &s.up, &mut warnings),
        down: glyph(&section, "down", &s.down, &mut warnings),
        flat: glyph(&section, "flat", &s.flat, &mut warnings),
    };

    let section = Section::new("currency", &file.currency, &mut warnings);
    let currency = Currency {
        default: match section.text("default", &mut warnings) {
            Some(code) if is_currency_code(code.trim()) => code.trim().to_ascii_uppercase(),
            Some(code) => {
                warnings.push(format!(
                    "currency.default `{code}` is not a currency code, using {}",
                    defaults.currency.default
                ));
                defaults.currency.default.clone()
            }
            None => defaults.currency.default.clone(),
        },
        symbol: section
            .text("symbol", &mut warnings)
            .map(str::to_string)
            .unwrap_or_else(|| defaults.currency.symbol.clone()),
    };

    (
        DisplayConfig {
            colors,
            display,
            symbols,
            currency,
        },
        warnings,
    )
}

/// `#RRGGBB` or a terminal color name such as `red` or `bright_blue`.
pub fn parse_color(input: &str) -> Option<Color> {
    if let Some(rgb) = Rgb::parse_hex(input) {
        return Some(rgb.into());
    }
    Color::from_str(&input.trim().to_ascii_lowercase().replace('_', " ")).ok()
}

fn color(section: &Section, role: &str, default: Color, warnings: &mut Vec<String>) -> Color {
    let Some(text) = section.text(role, warnings) else {
        return default;
    };
    parse_color(text).unwrap_or_else(|| {
        warnings.push(format!(
            "colors.{role} `{text}` is neither #RRGGBB nor a color name, using default"
        ));
        default
    })
}

fn size(section: &Section, key: &str, default: usize, warnings: &mut Vec<String>) -> usize {
    let Some(value) = section.get(key) else {
        return default;
    };
    let whole = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        _ => None,
    };
    match whole {
        Some(n) if n >= 1 => usize::try_from(n).unwrap_or(default),
        Some(n) => {
            warnings.push(format!("display.{key} must be at least 1, got {n}; using 1"));
            1
        }
        None => {
            warnings.push(format!(
                "display.{key} must be a whole number, got {value}; using {default}"
            ));
            default
        }
    }
}

fn flag(section: &Section, key: &str, default: bool, warnings: &mut Vec<String>) -> bool {
    match section.get(key) {
        None => default,
        Some(Value::Bool(on)) => *on,
        Some(other) => {
            warnings.push(format!(
                "display.{key} must be true or false, got {other}; using {default}"
            ));
            default
        }
    }
}

fn glyph(section: &Section, key: &str, default: &str, warnings: &mut Vec<String>) -> String {
    let Some(text) = section.text(key, warnings) else {
        return default.to_string();
    };
    let mut chars = text.trim().chars();
    match (chars.next(), chars.next()) {
        (None, _) => {
            warnings.push(format!("symbols.{key} is empty, using `{default}`"));
            default.to_string()
        }
        (Some(first), Some(_)) => {
            warnings.push(format!(
                "symbols.{key} `{text}` is not a single glyph, using `{first}`"
            ));
            first.to_string()
        }
        (Some(first), None) => first.to_string(),
    }
}

fn is_currency_code(code: &str) -> bool {
    (2..=5).contains(&code.len()) && code.chars().all(|c| c.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = DisplayConfig::from_json_str("{}").expect("valid json");
        assert_eq!(config, DisplayConfig::default());
        assert_eq!(config.display.max_tickers_per_row, 4);
        assert_eq!(config.display.max_tickers, 12);
        assert!(config.display.show_period_changes);
        assert_eq!(config.symbols.up, "▲");
        assert_eq!(config.currency.symbol, "$");
    }

    #[test]
    fn partial_sections_merge_with_defaults() {
        let config = DisplayConfig::from_json_str(
            r##"{
                "display": {"chart_width": 30},
                "colors": {"ticker": "#123456"},
                "theme": "dark"
            }"##,
        )
        .expect("valid json");
        assert_eq!(config.display.chart_width, 30);
        assert_eq!(config.display.chart_height, 8);
        assert_eq!(config.colors.ticker, Color::from(Rgb::new(0x12, 0x34, 0x56)));
        assert_eq!(config.colors.positive, Colors::default().positive);
    }

    #[test]
    fn bad_values_fall_back_with_warnings() {
        let file: ConfigFile = serde_json::from_str(
            r##"{
                "colors": {"negative": "reddish"},
                "display": {"chart_height": 0, "max_tickers": 3, "max_tickers_per_row": 5},
                "symbols": {"up": "", "down": "vv"},
                "currency": {"default": "12$"}
            }"##,
        )
        .expect("valid json");
        let (config, warnings) = resolve(file);

        assert_eq!(config.colors.negative, Colors::default().negative);
        assert_eq!(config.display.chart_height, 1);
        assert_eq!(config.display.max_tickers_per_row, 3);
        assert_eq!(config.symbols.up, "▲");
        assert_eq!(config.symbols.down, "v");
        assert_eq!(config.currency.default, "USD");
        assert_eq!(warnings.len(), 6);
    }

    #[test]
    fn mistyped_keys_only_cost_themselves() {
        let file: ConfigFile = serde_json::from_str(
            r##"{
                "colors": {"positive": "#00AA00", "price": 7},
                "display": {"chart_width": 30.0, "chart_height": "tall", "max_tickers": 2.5,
                            "show_period_changes": "yes"},
                "symbols": ["^"],
                "currency": {"symbol": false}
            }"##,
        )
        .expect("mistyped values still parse");
        let (config, warnings) = resolve(file);
        let defaults = DisplayConfig::default();

        assert_eq!(config.colors.positive, Color::from(Rgb::new(0x00, 0xAA, 0x00)));
        assert_eq!(config.colors.price, defaults.colors.price);
        assert_eq!(config.display.chart_width, 30);
        assert_eq!(config.display.chart_height, defaults.display.chart_height);
        assert_eq!(config.display.max_tickers, defaults.display.max_tickers);
        assert!(config.display.show_period_changes);
        assert_eq!(config.symbols, defaults.symbols);
        assert_eq!(config.currency.symbol, "$");
        assert_eq!(warnings.len(), 6);
        assert!(warnings.iter().any(|w| w.contains("chart_height")));
    }

    #[test]
    fn color_names_resolve_alongside_hex() {
        let config = DisplayConfig::from_json_str(
            r#"{"colors": {"negative": "red", "ticker": "bright_blue", "price": "Yellow"}}"#,
        )
        .expect("valid json");
        assert_eq!(config.colors.negative, Color::Red);
        assert_eq!(config.colors.ticker, Color::BrightBlue);
        assert_eq!(config.colors.price, Color::Yellow);
        assert_eq!(parse_color("crimson"), None);
    }

    #[test]
    fn hex_colors_parse_with_or_without_hash() {
        assert_eq!(Rgb::parse_hex("#00ff7F"), Some(Rgb::new(0, 255, 127)));
        assert_eq!(Rgb::parse_hex("FFFFFF"), Some(Rgb::new(255, 255, 255)));
        assert_eq!(Rgb::parse_hex("#FFF"), None);
        assert_eq!(Rgb::parse_hex("#GG0000"), None);
    }

    #[test]
    fn currency_code_is_lowercased_for_queries() {
        let config =
            DisplayConfig::from_json_str(r#"{"currency": {"default": "eur", "symbol": "€"}}"#)
                .expect("valid json");
        assert_eq!(config.currency.default, "EUR");
        assert_eq!(config.currency.query_code(), "eur");
        assert_eq!(config.currency.symbol, "€");
    }
}
