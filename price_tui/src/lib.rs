//! Terminal price board.
//!
//! Turns a `price_fetch::FetchReport` into a grid of bordered quote panels:
//! - `view`: the pure renderers (styled lines, sparkline, panel, grid).
//! - `screen`: one frame built from a report, with a degraded panel per failure.
//! - `selection`: ticker arguments and list files to a deduplicated request.
//! - `watch`: the cancellable refresh loop.
//! - `error`: `RenderError` and the exit-code carrying `CliError`.
#![warn(missing_docs)]
pub mod error;
pub mod screen;
pub mod selection;
pub mod view;
pub mod watch;

pub use error::{CliError, RenderError};
pub use screen::Screen;
