//! Ticker symbols, asset classification and ticker-list parsing.

use std::fmt::{Display, Formatter};
use std::io::BufRead;

use log::warn;
use strum_macros::{Display, EnumString};

use crate::error::PriceError;

const MAX_SYMBOL_LEN: usize = 15;

/// Normalized instrument symbol, always uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(String);

impl Symbol {
    /// Parse and normalize a symbol to uppercase.
    ///
    /// Accepts 1 to 15 characters: an optional leading `^` (indices such as `^GSPC`),
    /// then an ASCII letter followed by ASCII alphanumerics, `.`, `-` or `=`
    /// (`BRK.B`, `EURUSD=X`, `GC=F`).
    pub fn parse(input: &str) -> Result<Self, PriceError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(PriceError::ParseTickers(String::from("empty ticker")));
        }

        let normalized = trimmed.to_ascii_uppercase();
        let len = normalized.chars().count();
        if len > MAX_SYMBOL_LEN {
            return Err(PriceError::ParseTickers(format!(
                "ticker `{normalized}` is {len} characters long, max is {MAX_SYMBOL_LEN}"
            )));
        }

        let body = normalized.strip_prefix('^').unwrap_or(&normalized);
        if !body.chars().next().is_some_and(|first| first.is_ascii_alphabetic()) {
            return Err(PriceError::ParseTickers(format!(
                "ticker `{normalized}` must start with a letter"
            )));
        }

        if let Some(ch) = body
            .chars()
            .find(|ch| !(ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '=')))
        {
            return Err(PriceError::ParseTickers(format!(
                "ticker `{normalized}` contains invalid character `{ch}`"
            )));
        }

        Ok(Self(normalized))
    }

    /// Borrow the normalized symbol text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Classify the symbol into the provider family that serves it.
    pub fn kind(&self) -> AssetKind {
        if self.known_coin().is_some() {
            AssetKind::DigitalAsset
        } else {
            AssetKind::Equity
        }
    }

    /// Known digital asset named by this symbol, if any.
    pub fn known_coin(&self) -> Option<KnownCoin> {
        self.0.parse::<KnownCoin>().ok()
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Instrument family; decides the provider and some formatting rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum AssetKind {
    /// Listed stock or fund, served by the equity provider.
    #[strum(serialize = "Equity")]
    Equity,
    /// Cryptocurrency, served by the digital-asset provider.
    #[strum(serialize = "Crypto")]
    DigitalAsset,
}

/// Digital assets recognised by ticker.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum KnownCoin {
    BTC,
    ETH,
    ADA,
    DOT,
    LINK,
    LTC,
    XRP,
    DOGE,
    SHIB,
    MATIC,
    AVAX,
    SOL,
    HBAR,
}

impl KnownCoin {
    /// Identifier used by the digital-asset provider.
    pub fn asset_id(&self) -> &'static str {
        match self {
            KnownCoin::BTC => "bitcoin",
            KnownCoin::ETH => "ethereum",
            KnownCoin::ADA => "cardano",
            KnownCoin::DOT => "polkadot",
            KnownCoin::LINK => "chainlink",
            KnownCoin::LTC => "litecoin",
            KnownCoin::XRP => "ripple",
            KnownCoin::DOGE => "dogecoin",
            KnownCoin::SHIB => "shiba-inu",
            KnownCoin::MATIC => "matic-network",
            KnownCoin::AVAX => "avalanche-2",
            KnownCoin::SOL => "solana",
            KnownCoin::HBAR => "hedera-hashgraph",
        }
    }
}

/// Trait providing list parsing for tickers.
pub trait TickerParser: Sized {
    /// Parses tickers from a buffered reader.
    ///
    /// Tickers may be separated by commas, whitespace or new lines. Entries that are
    /// not valid tickers are logged and skipped; only read failures are errors.
    fn parse_from_reader<R: BufRead>(reader: R) -> Result<Vec<Self>, PriceError>;
}

impl TickerParser for Symbol {
    fn parse_from_reader<R: BufRead>(reader: R) -> Result<Vec<Self>, PriceError> {
        let mut tickers = Vec::new();

        for line_result in reader.lines() {
            let line = line_result?;
            for entry in line
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|entry| !entry.is_empty())
            {
                match Symbol::parse(entry) {
                    Ok(symbol) => tickers.push(symbol),
                    Err(e) => warn!("Skipping ticker: {}", e),
                }
            }
        }
        Ok(tickers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn symbols_are_trimmed_and_uppercased() {
        let symbol = Symbol::parse("  aapl ").expect("valid");
        assert_eq!(symbol.as_str(), "AAPL");
    }

    #[test]
    fn symbols_reject_bad_shapes() {
        assert!(Symbol::parse("").is_err());
        assert!(Symbol::parse("1ABC").is_err());
        assert!(Symbol::parse("AB$C").is_err());
        assert!(Symbol::parse("ABCDEFGHIJKLMNOP").is_err());
        assert!(Symbol::parse("BRK.B").is_ok());
        assert!(Symbol::parse("BTC-USD").is_ok());
        assert!(Symbol::parse("^").is_err());
        assert!(Symbol::parse("^1AB").is_err());
        assert!(Symbol::parse("A^B").is_err());
    }

    #[test]
    fn index_and_futures_symbols_are_accepted() {
        for input in ["^GSPC", "eurusd=x", "GC=F", "^n225"] {
            let symbol = Symbol::parse(input).expect("valid");
            assert_eq!(symbol.as_str(), input.to_ascii_uppercase());
            assert_eq!(symbol.kind(), AssetKind::Equity);
        }
    }

    #[test]
    fn known_coins_classify_as_digital_assets() {
        let btc = Symbol::parse("btc").expect("valid");
        assert_eq!(btc.kind(), AssetKind::DigitalAsset);
        assert_eq!(btc.known_coin().map(|c| c.asset_id()), Some("bitcoin"));

        let hbar = Symbol::parse("HBAR").expect("valid");
        assert_eq!(hbar.known_coin().map(|c| c.asset_id()), Some("hedera-hashgraph"));

        let aapl = Symbol::parse("AAPL").expect("valid");
        assert_eq!(aapl.kind(), AssetKind::Equity);
        assert!(aapl.known_coin().is_none());
    }

    #[test]
    fn ticker_lists_split_on_commas_spaces_and_lines() {
        let input = Cursor::new("AAPL, msft\n\nbtc   ETH,\n");
        let tickers = Symbol::parse_from_reader(input).expect("valid list");
        let names: Vec<&str> = tickers.iter().map(Symbol::as_str).collect();
        assert_eq!(names, vec!["AAPL", "MSFT", "BTC", "ETH"]);
    }

    #[test]
    fn ticker_lists_skip_invalid_entries() {
        let input = Cursor::new("AAPL\n9X, AB$C\ntsla");
        let tickers = Symbol::parse_from_reader(input).expect("readable");
        let names: Vec<&str> = tickers.iter().map(Symbol::as_str).collect();
        assert_eq!(names, vec!["AAPL", "TSLA"]);
    }

    #[test]
    fn kind_display_names_panel_titles() {
        assert_eq!(AssetKind::Equity.to_string(), "Equity");
        assert_eq!(AssetKind::DigitalAsset.to_string(), "Crypto");
    }
}
