//! Behavior tests for loading the display configuration from disk.

use colored::Color;
use price_common::ConfigError;
use price_common::config::{DisplayConfig, Rgb};
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn when_file_sets_some_keys_the_rest_default() {
    let file = config_file(
        r##"{
            "colors": {"positive": "#00AA00"},
            "display": {"max_tickers_per_row": 3, "show_period_changes": false},
            "extra": {"ignored": true}
        }"##,
    );
    let config = DisplayConfig::load(Some(file.path())).expect("loads");
    let defaults = DisplayConfig::default();

    assert_eq!(config.colors.positive, Color::from(Rgb::new(0x00, 0xAA, 0x00)));
    assert_eq!(config.colors.negative, defaults.colors.negative);
    assert_eq!(config.display.max_tickers_per_row, 3);
    assert!(!config.display.show_period_changes);
    assert_eq!(config.display.chart_width, defaults.display.chart_width);
    assert_eq!(config.symbols, defaults.symbols);
    assert_eq!(config.currency, defaults.currency);
}

#[test]
fn when_values_are_invalid_each_key_is_repaired_alone() {
    let file = config_file(
        r##"{
            "colors": {"negative": "crimson", "ticker": "#112233"},
            "display": {"chart_height": 0},
            "currency": {"default": "eur", "symbol": "€"}
        }"##,
    );
    let config = DisplayConfig::load(Some(file.path())).expect("loads");
    let defaults = DisplayConfig::default();

    assert_eq!(config.colors.negative, defaults.colors.negative);
    assert_eq!(config.colors.ticker, Color::from(Rgb::new(0x11, 0x22, 0x33)));
    assert_eq!(config.display.chart_height, 1);
    assert_eq!(config.currency.symbol, "€");
    assert_eq!(config.currency.query_code(), "eur");
}

#[test]
fn when_a_key_has_the_wrong_json_type_the_file_still_loads() {
    let file = config_file(
        r##"{
            "colors": {"positive": "#00AA00", "negative": "magenta"},
            "display": {"chart_width": 30.0, "chart_height": "tall"}
        }"##,
    );
    let config = DisplayConfig::load(Some(file.path())).expect("loads");
    let defaults = DisplayConfig::default();

    assert_eq!(config.colors.positive, Color::from(Rgb::new(0x00, 0xAA, 0x00)));
    assert_eq!(config.colors.negative, Color::Magenta);
    assert_eq!(config.display.chart_width, 30);
    assert_eq!(config.display.chart_height, defaults.display.chart_height);
}

#[test]
fn when_explicit_file_is_missing_loading_fails() {
    let dir = TempDir::new().expect("temp dir");
    let missing = dir.path().join("nope.json");
    assert!(matches!(
        DisplayConfig::load(Some(&missing)),
        Err(ConfigError::Read { .. })
    ));
}

#[test]
fn when_explicit_file_is_malformed_loading_fails() {
    let file = config_file("{ not json");
    assert!(matches!(
        DisplayConfig::load(Some(file.path())),
        Err(ConfigError::Parse { .. })
    ));
}
