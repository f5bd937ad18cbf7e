//! Progress reporting over the analysed packages
//!
//! The bar is drawn on stderr so it never mixes with diagnostics written
//! to stdout.

use crate::core::parallel::ProgressUpdate;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::info;
use std::sync::Arc;

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {wide_msg}";

/// Progress reporter for an analysis run
pub struct ProgressReporter {
    verbose: bool,
    bar: Option<ProgressBar>,
}

impl ProgressReporter {
    /// A reporter that draws nothing when `enabled` is false
    pub fn new(enabled: bool, verbose: bool) -> Self {
        let bar = enabled.then(|| {
            let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr());
            let style = ProgressStyle::default_bar()
                .template(BAR_TEMPLATE)
                .map(|style| style.progress_chars("#>-"))
                .unwrap_or_else(|_| ProgressStyle::default_bar());
            bar.set_style(style);
            bar
        });

        Self { verbose, bar }
    }

    /// A reporter that never draws
    pub fn hidden() -> Self {
        Self::new(false, false)
    }

    pub fn is_enabled(&self) -> bool {
        self.bar.is_some()
    }

    pub fn start(&self, operation: &str) {
        if let Some(bar) = &self.bar {
            bar.reset();
            bar.set_message(operation.to_string());
        }
        if self.verbose {
            info!("Starting: {}", operation);
        }
    }

    pub fn update(&self, current: usize, total: usize, message: &str) {
        if let Some(bar) = &self.bar {
            bar.set_length(total as u64);
            bar.set_position(current as u64);
            bar.set_message(message.to_string());
        }
        if self.verbose {
            info!("[{}/{}] {}", current, total, message);
        }
    }

    pub fn update_from(&self, progress: ProgressUpdate) {
        self.update(progress.current, progress.total, &progress.message);
    }

    /// Position of the bar, if one is drawn
    pub fn position(&self) -> Option<u64> {
        self.bar.as_ref().map(|bar| bar.position())
    }

    /// Remove the bar from the terminal
    pub fn finish(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
        if self.verbose {
            info!("Finished: {}", message);
        }
    }
}

/// Create a progress callback function that updates a ProgressReporter
pub fn create_progress_callback(
    reporter: Arc<ProgressReporter>,
) -> impl Fn(ProgressUpdate) + Send + Sync {
    move |progress: ProgressUpdate| {
        reporter.update_from(progress);
    }
}
