//! Download progress indicator.
//!
//! The indicator is purely cosmetic: a spinner advanced by a timer on its own
//! thread. It shares no state with the copy it accompanies. The only
//! synchronisation is the done signal sent by [`ProgressIndicator::stop`],
//! after which the thread is joined, so no frame is drawn once `stop`
//! returns. Dropping the indicator stops it the same way, which keeps the
//! thread bound to the lifetime of the download even on error paths.

use crossbeam_channel::{Receiver, Sender, bounded, select, tick};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::thread::JoinHandle;
use std::time::Duration;

/// Number of frames in the growing `=` animation before it wraps.
const FRAME_COUNT: usize = 19;

const TEMPLATE: &str = "{spinner} {msg}";

/// Where the indicator draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressMode {
    /// Draw a spinner on stdout, alongside the status messages.
    #[default]
    Terminal,
    /// Track ticks without drawing anything.
    Hidden,
}

impl ProgressMode {
    /// Creates a bar suitable for this mode.
    #[must_use]
    pub fn bar(self) -> ProgressBar {
        match self {
            Self::Terminal => styled_spinner(ProgressDrawTarget::stdout()),
            Self::Hidden => ProgressBar::hidden(),
        }
    }
}

/// The `>`, `=>`, `==>` ... animation, wrapping after [`FRAME_COUNT`] frames.
fn frames() -> Vec<String> {
    (0..FRAME_COUNT)
        .map(|n| format!("{}>", "=".repeat(n)))
        .collect()
}

fn spinner_style() -> ProgressStyle {
    let mut owned = frames();
    // indicatif shows the last string once the bar is finished.
    owned.push(String::new());
    let tick_strings: Vec<&str> = owned.iter().map(String::as_str).collect();

    ProgressStyle::with_template(TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&tick_strings)
}

fn styled_spinner(target: ProgressDrawTarget) -> ProgressBar {
    let bar = ProgressBar::with_draw_target(None, target);
    bar.set_style(spinner_style());
    bar
}

/// A running progress indicator.
pub struct ProgressIndicator {
    bar: ProgressBar,
    done: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for ProgressIndicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressIndicator")
            .field("ticks", &self.bar.position())
            .field("running", &self.worker.is_some())
            .finish()
    }
}

impl ProgressIndicator {
    /// Starts advancing `bar` once every `interval` on a dedicated thread.
    ///
    /// # Examples
    ///
    /// ```
    /// use atom_updater::progress::{ProgressIndicator, ProgressMode};
    /// use std::time::Duration;
    ///
    /// let indicator = ProgressIndicator::start(ProgressMode::Hidden.bar(), Duration::from_millis(5));
    /// // ... copy the download ...
    /// let ticks = indicator.stop();
    /// # let _ = ticks;
    /// ```
    #[must_use]
    pub fn start(bar: ProgressBar, interval: Duration) -> Self {
        let (done_tx, done_rx) = bounded(1);
        let worker_bar = bar.clone();
        let worker = std::thread::spawn(move || animate(&worker_bar, &done_rx, interval));
        Self {
            bar,
            done: Some(done_tx),
            worker: Some(worker),
        }
    }

    /// Number of frames drawn so far.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.bar.position()
    }

    /// Signals completion and waits for the indicator thread to exit.
    ///
    /// Returns the number of frames drawn.
    pub fn stop(mut self) -> u64 {
        self.shutdown();
        self.bar.position()
    }

    fn shutdown(&mut self) {
        if let Some(done) = self.done.take() {
            // A send only fails if the worker already exited; join reports why.
            done.send(()).unwrap_or_default();
        }
        if self
            .worker
            .take()
            .is_some_and(|worker| worker.join().is_err())
        {
            log::warn!("progress indicator thread panicked");
        }
    }
}

impl Drop for ProgressIndicator {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn animate(bar: &ProgressBar, done: &Receiver<()>, interval: Duration) {
    let ticker = tick(interval);
    loop {
        select! {
            recv(done) -> _ => break,
            recv(ticker) -> _ => advance(bar),
        }
    }
    bar.finish_and_clear();
}

/// Moves the animation on by exactly one frame.
///
/// `inc` redraws the spinner itself; an extra `tick` would skip a frame.
fn advance(bar: &ProgressBar) {
    bar.inc(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use indicatif::InMemoryTerm;

    const INTERVAL: Duration = Duration::from_millis(5);

    #[test]
    fn indicator_ticks_while_running() {
        let indicator = ProgressIndicator::start(ProgressMode::Hidden.bar(), INTERVAL);
        std::thread::sleep(INTERVAL * 10);
        assert!(indicator.ticks() > 0);
        indicator.stop();
    }

    #[test]
    fn indicator_is_silent_after_stop() {
        let bar = ProgressMode::Hidden.bar();
        let indicator = ProgressIndicator::start(bar.clone(), INTERVAL);
        std::thread::sleep(INTERVAL * 4);

        let frames = indicator.stop();
        std::thread::sleep(INTERVAL * 10);

        assert_eq!(bar.position(), frames);
        assert!(bar.is_finished());
    }

    #[test]
    fn dropping_the_indicator_stops_it() {
        let bar = ProgressMode::Hidden.bar();
        {
            let _indicator = ProgressIndicator::start(bar.clone(), INTERVAL);
            std::thread::sleep(INTERVAL * 2);
        }
        let frames = bar.position();
        std::thread::sleep(INTERVAL * 10);

        assert_eq!(bar.position(), frames);
        assert!(bar.is_finished());
    }

    #[test]
    fn immediate_stop_draws_nothing_further() {
        let bar = ProgressMode::Hidden.bar();
        let frames = ProgressIndicator::start(bar.clone(), Duration::from_secs(60)).stop();
        assert_eq!(frames, 0);
        assert!(bar.is_finished());
    }

    #[test]
    fn frames_grow_then_wrap() {
        let all = frames();
        assert_eq!(all.len(), FRAME_COUNT);
        assert_eq!(all.first().map(String::as_str), Some(">"));
        assert_eq!(all.get(2).map(String::as_str), Some("==>"));
        assert_eq!(all.last().map(String::len), Some(FRAME_COUNT));
    }

    #[test]
    fn each_timer_tick_draws_the_next_frame() {
        let term = InMemoryTerm::new(4, 40);
        let bar = styled_spinner(ProgressDrawTarget::term_like(Box::new(term.clone())));

        let drawn: Vec<String> = (0..4)
            .map(|_| {
                advance(&bar);
                term.contents().trim_end().to_owned()
            })
            .collect();

        assert_eq!(drawn, ["=>", "==>", "===>", "====>"]);
        assert_eq!(bar.position(), 4);
    }

    #[test]
    fn terminal_mode_builds_an_unbounded_spinner() {
        let bar = ProgressMode::Terminal.bar();
        assert_eq!(bar.length(), None);
        assert_eq!(bar.position(), 0);
    }

    #[test]
    fn spinner_template_is_valid() {
        assert!(ProgressStyle::with_template(TEMPLATE).is_ok());
    }
}
