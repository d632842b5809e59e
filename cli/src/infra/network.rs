//! Network infrastructure: implements `LlmProbe` with ureq on a blocking thread.

use std::time::Duration;

use anyhow::Result;

use crate::application::ports::LlmProbe;

/// Model name sent in the probe request; the server ignores it beyond
/// basic validation.
const PROBE_MODEL: &str = "llama-2-7b-chat";

/// Minimal chat-completion request body: one `Ping` message, one token.
#[must_use]
pub fn probe_body() -> serde_json::Value {
    serde_json::json!({
        "model": PROBE_MODEL,
        "messages": [{ "role": "user", "content": "Ping" }],
        "max_tokens": 1,
    })
}

/// Production probe using a blocking HTTP client.
pub struct UreqLlmProbe;

impl LlmProbe for UreqLlmProbe {
    async fn ping(&self, url: &str, timeout: Duration) -> Result<bool> {
        let url = url.to_string();
        let body = probe_body().to_string();
        let online = tokio::task::spawn_blocking(move || {
            let agent = ureq::AgentBuilder::new().timeout(timeout).build();
            match agent
                .post(&url)
                .set("Content-Type", "application/json")
                .send_string(&body)
            {
                Ok(resp) => resp.status() == 200,
                Err(ureq::Error::Status(code, _)) => {
                    tracing::debug!(code, url = %url, "endpoint answered with error status");
                    false
                }
                Err(e) => {
                    tracing::debug!(error = %e, url = %url, "endpoint unreachable");
                    false
                }
            }
        })
        .await
        .map_err(|e| anyhow::anyhow!("spawn_blocking panicked: {e}"))?;
        Ok(online)
    }
}
