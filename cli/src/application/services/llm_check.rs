//! Readiness probe for the OpenAI-compatible endpoint.

use std::time::Duration;

use anyhow::Result;

use crate::application::ports::{LlmProbe, ProgressReporter};

/// Per-request timeout for a single ping.
pub const PING_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of [`wait_for_llm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmStatus {
    /// The endpoint answered 200 on the given attempt (1-based).
    Online { attempt: u32 },
    /// Every attempt failed.
    Offline { attempts: u32 },
}

impl LlmStatus {
    #[must_use]
    pub fn is_online(self) -> bool {
        matches!(self, Self::Online { .. })
    }
}

/// Ping `url`, retrying up to `retries` more times with `interval` between
/// attempts.
///
/// A transport error counts as a failed attempt.
///
/// # Errors
///
/// Never fails today; the `Result` leaves room for probes that can.
pub async fn wait_for_llm(
    probe: &impl LlmProbe,
    url: &str,
    retries: u32,
    interval: Duration,
    reporter: &impl ProgressReporter,
) -> Result<LlmStatus> {
    let attempts = retries.saturating_add(1);
    for attempt in 1..=attempts {
        match probe.ping(url, PING_TIMEOUT).await {
            Ok(true) => return Ok(LlmStatus::Online { attempt }),
            Ok(false) => tracing::debug!(attempt, "endpoint not ready"),
            Err(e) => tracing::debug!(attempt, error = %e, "probe failed"),
        }
        if attempt < attempts {
            reporter.step(&format!(
                "waiting for {url} (attempt {attempt}/{attempts}, next in {}s)...",
                interval.as_secs()
            ));
            tokio::time::sleep(interval).await;
        }
    }
    Ok(LlmStatus::Offline { attempts })
}
