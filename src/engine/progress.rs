//! Progress bar utilities for displaying scan status

use kdam::{Animation, Bar, BarExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

// Progress bar type alias
pub type ProgressBar = Arc<Mutex<Bar>>;

/// Configuration for creating a progress bar
pub struct ProgressBarConfig {
    pub total: usize,
    pub desc: &'static str,
    pub animation: Animation,
}

impl ProgressBarConfig {
    pub fn new(total: usize, desc: &'static str, animation: Animation) -> Self {
        Self {
            total,
            desc,
            animation,
        }
    }
}

/// Create a progress bar with the given configuration
pub fn create_progress_bar(config: ProgressBarConfig) -> ProgressBar {
    Arc::new(Mutex::new(kdam::tqdm!(
        total = config.total,
        desc = config.desc,
        animation = config.animation
    )))
}

/// Move the bar to the current value of `done`. Uses try_lock so workers never wait on the
/// terminal; a skipped update is caught up by the next one. `done` is read under the lock, so
/// the bar never moves backwards.
pub fn update_progress_bar_to(pb: &ProgressBar, done: &AtomicUsize) {
    if let Ok(mut bar) = pb.try_lock() {
        let _ = bar.update_to(done.load(Ordering::Relaxed));
    }
}

/// Items processed so far against the total from the counting pass.
///
/// Purely advisory: nothing reads it to decide what to scan, and `done` may end short of (or
/// past) `total` when the tree changes between the two passes.
pub struct ProgressCounter {
    done: AtomicUsize,
    total: usize,
    bar: Option<ProgressBar>,
}

impl ProgressCounter {
    pub fn new(total: usize, bar: Option<ProgressBar>) -> Self {
        Self {
            done: AtomicUsize::new(0),
            total,
            bar,
        }
    }

    /// Counter with nothing drawn (lib callers, tests).
    pub fn hidden(total: usize) -> Self {
        Self::new(total, None)
    }

    /// Counter backed by a bar on stderr when `show` is set.
    pub fn with_bar(total: usize, desc: &'static str, show: bool) -> Self {
        let bar = show.then(|| {
            create_progress_bar(ProgressBarConfig::new(total, desc, Animation::Classic))
        });
        Self::new(total, bar)
    }

    pub fn inc(&self) {
        self.done.fetch_add(1, Ordering::Relaxed);
        if let Some(bar) = &self.bar {
            update_progress_bar_to(bar, &self.done);
        }
    }

    pub fn done(&self) -> usize {
        self.done.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Push the bar to 100% once every task has joined. Items nested under top-level
    /// directories are counted up front but never ticked one by one.
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            let mut bar = bar.lock().unwrap_or_else(PoisonError::into_inner);
            let end = bar.total.max(self.done());
            let _ = bar.update_to(end);
            eprintln!();
        }
    }
}
