//! Ticker selection from the command line and an optional list file.
use log::{debug, info};
use price_common::{AssetKind, PriceError, Symbol, TickerParser};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{CliError, RenderError};

/// Collect, classify and deduplicate the requested tickers.
///
/// Positional entries come first, then the entries of `file`. Invalid entries are
/// skipped with a warning; repeats keep their first position. At least one and at
/// most `max` tickers must remain.
pub fn select(
    positional: &[String],
    file: Option<&Path>,
    max: usize,
) -> Result<Vec<(Symbol, AssetKind)>, CliError> {
    let mut symbols = Symbol::parse_from_reader(positional.join(" ").as_bytes())?;
    if let Some(path) = file {
        let reader = BufReader::new(File::open(path).map_err(PriceError::Io)?);
        symbols.extend(Symbol::parse_from_reader(reader)?);
    }

    let mut seen = HashSet::new();
    let selected: Vec<(Symbol, AssetKind)> = symbols
        .into_iter()
        .filter(|symbol| {
            let fresh = seen.insert(symbol.clone());
            if !fresh {
                debug!("Dropping repeated ticker {}", symbol);
            }
            fresh
        })
        .map(|symbol| {
            let kind = symbol.kind();
            (symbol, kind)
        })
        .collect();

    if selected.is_empty() {
        return Err(CliError::NoTickers);
    }
    if selected.len() > max {
        return Err(RenderError::TooManyPanels {
            count: selected.len(),
            max,
        }
        .into());
    }
    info!("Tickers: {:?}", selected.iter().map(|(s, _)| s.as_str()).collect::<Vec<_>>());
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn repeats_and_invalid_entries_are_dropped() {
        let selected = select(&args(&["aapl,btc", "AAPL", "9bad", "eth"]), None, 12)
            .expect("valid selection");
        let names: Vec<(&str, AssetKind)> =
            selected.iter().map(|(s, k)| (s.as_str(), *k)).collect();
        assert_eq!(
            names,
            vec![
                ("AAPL", AssetKind::Equity),
                ("BTC", AssetKind::DigitalAsset),
                ("ETH", AssetKind::DigitalAsset),
            ]
        );
    }

    #[test]
    fn empty_selection_is_a_usage_error() {
        let err = select(&args(&["$$$"]), None, 12).expect_err("nothing valid");
        assert!(matches!(err, CliError::NoTickers));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn too_many_tickers_is_a_usage_error() {
        let err = select(&args(&["A", "B", "C"]), None, 2).expect_err("over the limit");
        assert!(matches!(
            err,
            CliError::Render(RenderError::TooManyPanels { count: 3, max: 2 })
        ));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn list_file_entries_follow_positional_ones() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        std::io::Write::write_all(&mut file, b"msft\nAAPL, tsla\n").expect("write list");

        let selected = select(&args(&["AAPL"]), Some(file.path()), 12).expect("valid selection");
        let names: Vec<&str> = selected.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(names, vec!["AAPL", "MSFT", "TSLA"]);
    }

    #[test]
    fn missing_list_file_is_reported() {
        let err = select(&args(&["AAPL"]), Some(Path::new("/definitely/not/here.txt")), 12)
            .expect_err("missing file");
        assert!(matches!(err, CliError::Price(PriceError::Io(_))));
    }
}
