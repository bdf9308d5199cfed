//! Watch mode: redraw the board on a fixed interval until stopped.
//!
//! The loop waits on a stop channel with `recv_timeout`, so a stop request ends the
//! wait immediately instead of after the interval. Frames are built completely
//! before anything is written, and each one goes out in a single write followed by
//! a flush; a stop between cycles therefore never leaves half a frame on screen.
use chrono::{DateTime, Local};
use crossbeam_channel::{Receiver, RecvTimeoutError};
use log::info;
use std::io::Write;
use std::time::Duration;

/// Time between two refreshes.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Clear the screen and move the cursor home.
pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Status line printed under every watch frame.
pub fn footer(now: DateTime<Local>) -> String {
    format!(
        "Last update: {}  (refresh every {}s, Ctrl+C to exit)",
        now.format("%Y-%m-%d %H:%M:%S"),
        REFRESH_INTERVAL.as_secs()
    )
}

/// Draw frames from `next_frame` into `out` every `interval` until `stop` fires or
/// is disconnected. Returns the number of frames drawn.
pub fn run<W, F>(
    out: &mut W,
    stop: &Receiver<()>,
    interval: Duration,
    mut next_frame: F,
) -> std::io::Result<usize>
where
    W: Write,
    F: FnMut() -> String,
{
    let mut frames = 0;
    loop {
        let frame = next_frame();
        let mut buffer = String::with_capacity(CLEAR_SCREEN.len() + frame.len());
        buffer.push_str(CLEAR_SCREEN);
        buffer.push_str(&frame);
        out.write_all(buffer.as_bytes())?;
        out.flush()?;
        frames += 1;

        match stop.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => continue,
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    info!("Watch mode stopped after {} frame(s)", frames);
    Ok(frames)
}
