// Copyright @yucwang 2026

use indicatif::{ProgressBar, ProgressStyle};

/// Progress sink for a render. Called from worker threads while the tile
/// claim lock is held, so implementations must be quick.
pub trait ProgressCallback: Send + Sync {
    /// Returns `false` to cancel the remaining work.
    fn progress(&self, done: usize, total: usize) -> bool;
    fn set_title(&self, title: &str);
}

/// Terminal progress bar, one bar per pass.
pub struct IndicatifProgress {
    bar: ProgressBar,
}

impl IndicatifProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("{prefix}[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} tiles")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Self { bar }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressCallback for IndicatifProgress {
    fn progress(&self, done: usize, total: usize) -> bool {
        self.bar.set_length(total as u64);
        self.bar.set_position(done as u64);
        true
    }

    fn set_title(&self, title: &str) {
        self.bar.reset();
        self.bar.set_prefix(title.to_string());
    }
}
