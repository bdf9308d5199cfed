//! Price board: prints a grid of stock and crypto quote panels with sparklines.
//!
//! Usage example (CLI):
//! ```bash
//! price AAPL MSFT BTC
//! price --watch --config ./config.json --file ./tickers.txt
//! ```
//!
//! Each run loads the display configuration, fetches every ticker concurrently,
//! normalizes the provider payloads and draws one frame. With `--watch` the frame is
//! redrawn every 30 seconds until Ctrl+C. Exit codes: 0 on success, 1 when no
//! ticker could be resolved, 2 for usage problems, 3 when the configuration cannot
//! be loaded.
mod args;

use crate::args::Args;
use chrono::Local;
use clap::Parser;
use crossbeam_channel::bounded;
use log::{error, info};
use price_common::{AssetKind, DisplayConfig, Symbol};
use price_fetch::Fetcher;
use price_tui::view::{AnsiPaint, Paint, PlainPaint};
use price_tui::watch::{self, REFRESH_INTERVAL};
use price_tui::{CliError, RenderError, Screen, selection};
use std::env;
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    init_logger();
    match run(Args::parse()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(args: Args) -> Result<ExitCode, CliError> {
    let config = DisplayConfig::load(args.config.as_deref())?;
    let request = selection::select(
        &args.tickers,
        args.file.as_deref(),
        config.display.max_tickers,
    )?;
    let fetcher = Fetcher::from_config(&config)?;
    let paint = painter(args.plain);

    if args.watch {
        let (stop_tx, stop_rx) = bounded::<()>(1);
        ctrlc::set_handler(move || {
            let _ = stop_tx.try_send(());
        })?;

        let mut stdout = io::stdout().lock();
        watch::run(&mut stdout, &stop_rx, REFRESH_INTERVAL, || {
            match draw(&fetcher, &request, &config, paint.as_ref()) {
                Ok((frame, _)) => format!("{frame}\n{}\n", watch::footer(Local::now())),
                Err(e) => {
                    error!("Cannot draw frame: {}", e);
                    format!("{e}\n")
                }
            }
        })?;
        info!("Bye");
        return Ok(ExitCode::SUCCESS);
    }

    let (frame, resolved) = draw(&fetcher, &request, &config, paint.as_ref())?;
    let mut stdout = io::stdout().lock();
    stdout.write_all(frame.as_bytes())?;
    stdout.flush()?;

    if resolved == 0 {
        return Err(CliError::NothingResolved(request.len()));
    }
    Ok(ExitCode::SUCCESS)
}

/// Fetch, lay out and paint one frame; also reports how many panels hold data.
fn draw(
    fetcher: &Fetcher,
    request: &[(Symbol, AssetKind)],
    config: &DisplayConfig,
    paint: &dyn Paint,
) -> Result<(String, usize), RenderError> {
    let report = fetcher.fetch_all(request);
    let screen = Screen::build(&report, config)?;
    Ok((screen.render(paint, &config.colors), screen.resolved()))
}

/// Colors are off with `--plain`, with `NO_COLOR` set, or when stdout is not a
/// terminal.
fn painter(plain: bool) -> Box<dyn Paint> {
    if plain || env::var_os("NO_COLOR").is_some() || !io::stdout().is_terminal() {
        Box::new(PlainPaint)
    } else {
        colored::control::set_override(true);
        Box::new(AnsiPaint)
    }
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();
}
