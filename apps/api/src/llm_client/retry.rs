//! Retry policy for the LLM orchestrator.
//!
//! The decision of whether to retry lives here as a pure function over
//! (error, attempt) so it is unit-testable without network calls or real
//! sleeps. The orchestrator loop in `mod.rs` consumes it together with an
//! injectable `Sleep` so tests can record backoff delays instead of waiting
//! them out.

use std::time::Duration;

use async_trait::async_trait;

use super::LlmError;

/// Total attempt budget for one orchestration call (initial call + retries).
pub const MAX_ATTEMPTS: u32 = 5;

/// Whether a failed attempt should be retried.
///
/// Only the transient-unavailable signal (HTTP 503 from the model endpoint)
/// is retryable, and only while the attempt budget holds. Auth failures,
/// malformed requests, rate limits other than 503, network errors, and
/// malformed model answers are all terminal.
pub fn should_retry(error: &LlmError, attempt: u32) -> bool {
    error.is_transient() && attempt + 1 < MAX_ATTEMPTS
}

/// Exponential backoff: 2^attempt seconds (1s, 2s, 4s, 8s, 16s for 0–4).
pub fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(1 << attempt)
}

/// Clock abstraction so tests never sleep for real.
#[async_trait]
pub trait Sleep: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by the tokio timer.
pub struct TokioSleep;

#[async_trait]
impl Sleep for TokioSleep {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
