#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared CLI utilities for the incident presentation tools.
//!
//! [`init_logger`] sets up `indicatif-log-bridge` so that `log::info!` and
//! friends are suspended while spinners redraw. [`Spinner`] covers the one
//! slow step these tools have: reading and filtering the incidents export.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

pub use indicatif::MultiProgress;

/// An indeterminate `indicatif` spinner for a single blocking step.
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    /// Adds a ticking spinner showing `message` to `multi`.
    #[must_use]
    pub fn start(multi: &MultiProgress, message: &str) -> Self {
        let bar = multi.add(ProgressBar::new_spinner());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        Self { bar }
    }

    /// Stops the spinner, leaving `message` on screen.
    pub fn finish(self, message: impl Into<String>) {
        self.bar.set_style(
            ProgressStyle::with_template("{msg:.green}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        self.bar.finish_with_message(message.into());
    }

    /// Stops the spinner and removes it from the terminal.
    pub fn finish_and_clear(self) {
        self.bar.finish_and_clear();
    }

    /// Runs `step` behind a spinner, clearing it on failure and leaving
    /// `done(&value)` on success.
    ///
    /// # Errors
    ///
    /// Returns whatever error `step` returns.
    pub fn run<T, E>(
        multi: &MultiProgress,
        message: &str,
        step: impl FnOnce() -> Result<T, E>,
        done: impl FnOnce(&T) -> String,
    ) -> Result<T, E> {
        let spinner = Self::start(multi, message);
        match step() {
            Ok(value) => {
                spinner.finish(done(&value));
                Ok(value)
            }
            Err(e) => {
                spinner.finish_and_clear();
                Err(e)
            }
        }
    }
}

/// Initializes the global logger wrapped in `indicatif-log-bridge` so that
/// `log::info!` and friends are suspended while spinners redraw.
///
/// Returns the [`MultiProgress`] that all spinners must be added to.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    // Build the pretty-env-logger logger manually so we can wrap it.
    let logger = pretty_env_logger::formatted_builder()
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .ok(); // Ignore error if logger was already set (e.g., in tests)

    log::set_max_level(level);

    multi
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_passes_value_through() {
        let multi = MultiProgress::with_draw_target(indicatif::ProgressDrawTarget::hidden());
        let result: Result<usize, String> =
            Spinner::run(&multi, "Loading", || Ok(42), |n| format!("{n} loaded"));
        assert_eq!(result, Ok(42));
    }

    #[test]
    fn run_passes_error_through() {
        let multi = MultiProgress::with_draw_target(indicatif::ProgressDrawTarget::hidden());
        let result: Result<usize, String> = Spinner::run(
            &multi,
            "Loading",
            || Err("boom".to_string()),
            |_| unreachable!(),
        );
        assert_eq!(result, Err("boom".to_string()));
    }
}
