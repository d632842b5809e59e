//! Progress indicators using indicatif

#![allow(clippy::expect_used)] // Templates are compile-time constants

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::Styles;

/// Create a spinner for indeterminate progress.
///
/// # Panics
///
/// Never in practice: the template is a constant.
#[must_use]
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", " "])
            .template("  {spinner:.cyan} {msg}")
            .expect("valid template"),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn finish_with(pb: &ProgressBar, prefix: &'static str, msg: &str) {
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {prefix} {msg}")
            .expect("valid template"),
    );
    pb.set_prefix(prefix);
    pb.finish_with_message(msg.to_string());
}

/// Finish a spinner with a checkmark.
pub fn finish_ok(pb: &ProgressBar, msg: &str) {
    finish_with(pb, "✓", msg);
}

/// Finish a spinner with a cross.
pub fn finish_error(pb: &ProgressBar, msg: &str) {
    finish_with(pb, "✗", msg);
}

/// `ProgressReporter` that drives a spinner: steps replace the spinner
/// message, everything else is printed above it.
pub struct SpinnerReporter {
    pb: ProgressBar,
    styles: Styles,
}

impl SpinnerReporter {
    #[must_use]
    pub fn new(msg: &str, styles: &Styles) -> Self {
        Self {
            pb: spinner(msg),
            styles: styles.clone(),
        }
    }

    #[must_use]
    pub fn bar(&self) -> &ProgressBar {
        &self.pb
    }
}

impl ProgressReporter for SpinnerReporter {
    fn step(&self, message: &str) {
        self.pb.set_message(message.to_string());
    }

    fn success(&self, message: &str) {
        self.pb
            .println(format!("  {} {message}", "✓".style(self.styles.success)));
    }

    fn warn(&self, message: &str) {
        self.pb
            .println(format!("  {} {message}", "!".style(self.styles.warning)));
    }

    fn error(&self, message: &str) {
        self.pb
            .println(format!("  {} {message}", "✗".style(self.styles.error)));
    }
}
