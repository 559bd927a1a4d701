// progress.rs - Shared, approximate scan progress

use std::sync::atomic::{AtomicUsize, Ordering};

use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar fed by a relaxed counter that any worker can bump
///
/// The bar is redrawn roughly every 1% of loci.
pub struct ScanProgress {
    bar: ProgressBar,
    completed: AtomicUsize,
    update_interval: usize,
}

impl ScanProgress {
    pub fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar().template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) ETA: {eta}",
        ) {
            bar.set_style(style.progress_chars("#>-"));
        }
        Self::with_bar(bar, total)
    }

    /// Counts without drawing anything
    pub fn hidden(total: usize) -> Self {
        Self::with_bar(ProgressBar::hidden(), total)
    }

    fn with_bar(bar: ProgressBar, total: usize) -> Self {
        Self {
            bar,
            completed: AtomicUsize::new(0),
            update_interval: std::cmp::max(1, total / 100),
        }
    }

    pub fn tick(&self) {
        let completed = self.completed.fetch_add(1, Ordering::Relaxed) + 1;
        if completed % self.update_interval == 0 {
            self.bar.set_position(completed as u64);
        }
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn finish(&self) {
        self.bar.set_position(self.completed() as u64);
        self.bar.finish_and_clear();
    }
}
