use atomic_counter::{AtomicCounter, RelaxedCounter};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Milliseconds between redraws.
const REFRESH_RATE: u64 = 100;

/// Progress of one pipeline stage (neighbour search, tessellation, order
/// parameters), counted in particles or particle-parameter pairs.
///
/// The per-particle workers in [`chunk_map`](crate::utils::chunk_map) share
/// the bar by reference and call [`Bar::tick`] as each particle finishes.
pub struct Bar {
    counter: Arc<RelaxedCounter>,
    pbar: Arc<ProgressBar>,
}

impl Bar {
    /// A stage bar that is never drawn, as used by tests and `--silent`.
    pub fn new(len: u64, prefix: String) -> Self {
        let progress_bar = ProgressBar::hidden();
        progress_bar.set_length(len);
        progress_bar.set_prefix(prefix);
        progress_bar.set_style(ProgressStyle::default_bar()
            .template("{prefix:<28}[{bar:40}] [{elapsed_precise}] {pos}/{len}")
            .progress_chars("=>-"));
        let pbar = Arc::new(progress_bar);
        let counter = Arc::new(RelaxedCounter::new(0));
        let draw_bar = pbar.clone();
        let draw_counter = counter.clone();
        thread::spawn(move || {
            while Arc::strong_count(&draw_counter) > 1
                  && !draw_bar.is_finished()
            {
                draw_bar.set_position(draw_counter.get() as u64);
                thread::sleep(Duration::from_millis(REFRESH_RATE));
            }
        });
        Self { counter, pbar }
    }

    /// A stage bar drawn to stderr, below the tracing output.
    pub fn visible(len: u64, prefix: String) -> Self {
        let bar = Self::new(len, prefix);
        bar.pbar.set_draw_target(ProgressDrawTarget::stderr());
        bar
    }

    /// The bar for a stage named `prefix`, hidden when the run is silent.
    pub fn stage(len: u64, prefix: &str, silent: bool) -> Self {
        if silent {
            Self::new(len, String::from(prefix))
        } else {
            Self::visible(len, String::from(prefix))
        }
    }

    /// One more particle done.
    pub fn tick(&self) {
        self.counter.inc();
    }
}

impl Drop for Bar {
    /// Removes the stage's bar so the next stage draws on a clean line.
    fn drop(&mut self) {
        if !self.pbar.is_finished() {
            self.pbar.set_position(self.counter.get() as u64);
            self.pbar.finish_and_clear();
        }
    }
}
