//! `TerminalReporter`: Presentation-layer implementation of `ProgressReporter`.
//!
//! Services emit progress through the port; this type turns the events into
//! styled status lines.

use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::OutputContext;
use crate::output::progress::SpinnerReporter;

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// - `step()` prints `"  → {message}"`
/// - `success()` prints `"  ✓ {message}"`
/// - `warn()` prints `"  ! {message}"`
/// - `error()` prints `"  ✗ {message}"` to stderr, even when quiet
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
}

impl<'a> TerminalReporter<'a> {
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        if !self.ctx.quiet {
            println!("  {} {message}", "→".style(self.ctx.styles.step));
        }
    }

    fn success(&self, message: &str) {
        self.ctx.success(message);
    }

    fn warn(&self, message: &str) {
        self.ctx.warn(message);
    }

    fn error(&self, message: &str) {
        self.ctx.error(message);
    }
}

/// Reporter that discards everything. Used in `--json` mode, where stdout
/// must carry only the JSON document.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn step(&self, message: &str) {
        tracing::debug!(message, "step");
    }

    fn success(&self, message: &str) {
        tracing::debug!(message, "success");
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!("{message}");
    }
}

/// The reporter chosen for the current output mode.
pub enum Reporter<'a> {
    Terminal(TerminalReporter<'a>),
    Spinner(SpinnerReporter),
    Silent(SilentReporter),
}

impl<'a> Reporter<'a> {
    /// Spinner on an interactive terminal, plain lines otherwise, nothing
    /// in `--json` mode.
    #[must_use]
    pub fn for_context(ctx: &'a OutputContext, json: bool, initial: &str) -> Self {
        if json {
            Self::Silent(SilentReporter)
        } else if ctx.show_progress() {
            Self::Spinner(SpinnerReporter::new(initial, &ctx.styles))
        } else {
            Self::Terminal(TerminalReporter::new(ctx))
        }
    }

    /// Clear the spinner, if any. Lines printed above it stay.
    pub fn finish(&self) {
        if let Self::Spinner(s) = self {
            s.bar().finish_and_clear();
        }
    }
}

impl ProgressReporter for Reporter<'_> {
    fn step(&self, message: &str) {
        match self {
            Self::Terminal(r) => r.step(message),
            Self::Spinner(r) => r.step(message),
            Self::Silent(r) => r.step(message),
        }
    }

    fn success(&self, message: &str) {
        match self {
            Self::Terminal(r) => r.success(message),
            Self::Spinner(r) => r.success(message),
            Self::Silent(r) => r.success(message),
        }
    }

    fn warn(&self, message: &str) {
        match self {
            Self::Terminal(r) => r.warn(message),
            Self::Spinner(r) => r.warn(message),
            Self::Silent(r) => r.warn(message),
        }
    }

    fn error(&self, message: &str) {
        match self {
            Self::Terminal(r) => r.error(message),
            Self::Spinner(r) => r.error(message),
            Self::Silent(r) => r.error(message),
        }
    }
}
