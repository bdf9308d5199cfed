//! Command-line arguments for the price board.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use clap::Parser;
use std::path::PathBuf;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about = "Stock and crypto prices in the terminal", long_about = None)]
pub struct Args {
    /// Refresh the board every 30 seconds until Ctrl+C.
    #[arg(short, long)]
    pub watch: bool,

    /// Configuration file; defaults to ./config.json when present.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// File with extra tickers separated by commas, spaces or new lines.
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Disable colors.
    #[arg(long)]
    pub plain: bool,

    /// Stock or crypto symbols, e.g. AAPL MSFT BTC.
    #[arg(value_name = "TICKER")]
    pub tickers: Vec<String>,
}
