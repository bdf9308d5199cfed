//! Fetch orchestrator.
//!
//! Dispatches one retrieval per requested symbol to the provider serving its kind;
//! a kind nobody serves fails that symbol alone.
//! Retrievals run concurrently on scoped worker threads; each worker reports its
//! outcome over a `crossbeam_channel` and the caller blocks until every outcome is
//! in. A failing symbol never affects the others. No retries are made.
use crossbeam_channel::unbounded;
use log::{debug, error, info};
use price_common::{AssetKind, DisplayConfig, FetchError, PriceError, RawPayload, Symbol};
use std::thread;
use std::time::Instant;

use crate::digital_asset::DigitalAssetProvider;
use crate::equity::EquityProvider;
use crate::provider::QuoteProvider;

/// Outcome for one requested symbol.
pub type FetchOutcome = Result<RawPayload, FetchError>;

/// Outcomes of one fetch cycle, in request order.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchReport {
    entries: Vec<(Symbol, AssetKind, FetchOutcome)>,
}

impl FetchReport {
    /// Entries in request order.
    pub fn entries(&self) -> &[(Symbol, AssetKind, FetchOutcome)] {
        &self.entries
    }

    /// Number of requested symbols.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was requested.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of failed retrievals.
    pub fn failures(&self) -> usize {
        self.entries.iter().filter(|(_, _, o)| o.is_err()).count()
    }
}

/// Routes symbols to providers and gathers their outcomes.
pub struct Fetcher {
    providers: Vec<Box<dyn QuoteProvider>>,
}

impl Fetcher {
    /// Fetcher over explicit providers. Symbols go to the first provider whose
    /// `kind` matches theirs.
    pub fn new(providers: Vec<Box<dyn QuoteProvider>>) -> Self {
        Self { providers }
    }

    /// Fetcher over the public providers, quoting digital assets in the configured
    /// currency.
    pub fn from_config(config: &DisplayConfig) -> Result<Self, PriceError> {
        Ok(Self::new(vec![
            Box::new(EquityProvider::new()?),
            Box::new(DigitalAssetProvider::new(&config.currency.query_code())?),
        ]))
    }

    fn provider(&self, kind: AssetKind) -> Option<&dyn QuoteProvider> {
        self.providers
            .iter()
            .find(|provider| provider.kind() == kind)
            .map(|provider| provider.as_ref())
    }

    /// Retrieve every symbol concurrently and return the outcomes in request order.
    pub fn fetch_all(&self, symbols: &[(Symbol, AssetKind)]) -> FetchReport {
        let started = Instant::now();
        info!("Fetching {} symbol(s)", symbols.len());

        let (tx, rx) = unbounded::<(usize, FetchOutcome)>();
        thread::scope(|scope| {
            let workers: Vec<_> = symbols
                .iter()
                .enumerate()
                .map(|(index, (symbol, kind))| {
                    let tx = tx.clone();
                    let provider = self.provider(*kind);
                    scope.spawn(move || {
                        let began = Instant::now();
                        let outcome = match provider {
                            Some(provider) => provider.fetch(symbol),
                            None => Err(FetchError::Network(format!(
                                "no provider serves {kind} symbols"
                            ))),
                        };
                        debug!(
                            "{} ({}) fetched in {:?}: {}",
                            symbol,
                            kind,
                            began.elapsed(),
                            if outcome.is_ok() { "ok" } else { "failed" }
                        );
                        // The receiver outlives the scope.
                        let _ = tx.send((index, outcome));
                    })
                })
                .collect();

            for worker in workers {
                if worker.join().is_err() {
                    error!("A fetch worker panicked");
                }
            }
        });
        drop(tx);

        let mut slots: Vec<Option<FetchOutcome>> = vec![None; symbols.len()];
        for (index, outcome) in rx.iter() {
            slots[index] = Some(outcome);
        }

        let entries: Vec<_> = symbols
            .iter()
            .zip(slots)
            .map(|((symbol, kind), slot)| {
                let outcome = slot.unwrap_or_else(|| {
                    Err(FetchError::Network(format!(
                        "retrieval for {symbol} stopped unexpectedly"
                    )))
                });
                (symbol.clone(), *kind, outcome)
            })
            .collect();

        let report = FetchReport { entries };
        info!(
            "Fetch cycle finished in {:?}: {} ok, {} failed",
            started.elapsed(),
            report.len() - report.failures(),
            report.failures()
        );
        report
    }
}
