//! Loading indicator for the REPL.
//!
//! Draws on stderr so result lines on stdout stay clean when piped.

use std::io::Write;
use std::time::Duration;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::consts::LOADING_TEXT;
use crate::events::Event;
use crate::form::state::View;

const FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const FRAME: Duration = Duration::from_millis(80);

fn frame_at(elapsed: Duration) -> &'static str {
    let step = (elapsed.as_millis() / FRAME.as_millis()) as usize;
    FRAMES[step % FRAMES.len()]
}

/// One spinner line, e.g. `⠹ Loading... 0.2s`.
fn render(elapsed: Duration) -> String {
    format!(
        "{} {} {:.1}s",
        frame_at(elapsed),
        LOADING_TEXT,
        elapsed.as_secs_f64()
    )
}

fn clear_line() {
    eprint!("\x1b[2K\r");
    let _ = std::io::stderr().flush();
}

/// Animate while the result area reads "Loading..." and clear the line as
/// soon as it reads anything else. Ends when the controller goes away.
pub fn follow_loading(mut events: broadcast::Receiver<Event>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(FRAME);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut loading_since: Option<Instant> = None;

        loop {
            tokio::select! {
                received = events.recv() => match received {
                    Ok(Event::StatusChanged { view, .. }) => {
                        let loading = view == View::Loading;
                        if loading && loading_since.is_none() {
                            loading_since = Some(Instant::now());
                        } else if !loading && loading_since.take().is_some() {
                            clear_line();
                        }
                    }
                    Ok(Event::ResponseDiscarded { .. }) | Err(RecvError::Lagged(_)) => {}
                    Err(RecvError::Closed) => break,
                },
                _ = ticker.tick(), if loading_since.is_some() => {
                    if let Some(since) = loading_since {
                        eprint!("\x1b[2K\r{}", render(since.elapsed()));
                        let _ = std::io::stderr().flush();
                    }
                }
            }
        }

        if loading_since.is_some() {
            clear_line();
        }
    })
}
