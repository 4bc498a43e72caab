//! Progress reporting while walking the tree
//!
//! A single spinner on stderr. It is hidden in quiet mode, when disabled,
//! and when stderr is not a terminal.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;

/// Spinner-backed progress reporter
pub struct ProgressReporter {
    spinner: Option<ProgressBar>,
    verbose: bool,
}

impl ProgressReporter {
    /// Create a reporter; `enabled` is usually `show_progress && !quiet`
    pub fn new(enabled: bool, verbose: bool) -> Self {
        let spinner = if enabled && std::io::stderr().is_terminal() {
            let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed}] {pos} files {wide_msg}") {
                bar.set_style(style);
            }
            bar.enable_steady_tick(Duration::from_millis(100));
            Some(bar)
        } else {
            None
        };

        Self { spinner, verbose }
    }

    /// Reporter that never draws anything
    pub fn hidden() -> Self {
        Self {
            spinner: None,
            verbose: false,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.spinner.is_some()
    }

    /// Record that the `count`-th file at `path` is about to be read
    pub fn file(&self, count: usize, path: &str) {
        if let Some(spinner) = &self.spinner {
            spinner.set_position(count as u64);
            spinner.set_message(path.to_string());
        }
        if self.verbose {
            tracing::info!(count, path, "mapping file");
        }
    }

    /// Stop and clear the spinner
    pub fn finish(&self) {
        if let Some(spinner) = &self.spinner {
            spinner.finish_and_clear();
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        self.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_reporter_is_inert() {
        let reporter = ProgressReporter::hidden();
        assert!(!reporter.is_visible());
        reporter.file(1, "src/app.ts");
        reporter.finish();
    }

    #[test]
    fn test_disabled_reporter_has_no_spinner() {
        assert!(!ProgressReporter::new(false, true).is_visible());
    }
}
