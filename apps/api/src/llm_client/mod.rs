/// LLM Client — the single point of entry for all Gemini API calls in ScreenWise.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// All LLM interactions MUST go through this module.
///
/// Model: gemini-2.5-pro (hardcoded — do not make configurable to prevent drift)
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod retry;

use retry::{backoff_delay, should_retry, Sleep, TokioSleep, MAX_ATTEMPTS};

/// The model used for all LLM calls in ScreenWise.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "gemini-2.5-pro";

/// Low temperature biases the model toward deterministic scoring.
const TEMPERATURE: f32 = 0.1;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("LLM endpoint unavailable (503): {0}")]
    Unavailable(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM response format was unexpected")]
    MalformedEnvelope,

    #[error("LLM returned malformed JSON: {0}")]
    Parse(String),

    #[error("LLM API failed after {attempts} attempts: {last_error}")]
    Exhausted { attempts: u32, last_error: String },
}

impl LlmError {
    /// True only for the transient-unavailable signal. Everything else —
    /// auth/config errors, network failures, non-503 rate limits, malformed
    /// model answers — is terminal.
    pub fn is_transient(&self) -> bool {
        matches!(self, LlmError::Unavailable(_))
    }
}

#[derive(Debug, Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig<'a>,
    model: &'a str,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig<'a> {
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
    #[serde(rename = "responseSchema")]
    response_schema: &'a Value,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// A raw reply from the model endpoint, before any classification.
#[derive(Debug, Clone)]
pub struct TransportReply {
    pub status: u16,
    pub body: String,
}

/// Wire seam for the orchestrator. Production sends over reqwest; tests
/// inject stubs that script status codes without a server.
#[async_trait]
pub trait LlmTransport: Send + Sync {
    async fn send(&self, body: &Value) -> Result<TransportReply, LlmError>;
}

struct HttpTransport {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

#[async_trait]
impl LlmTransport for HttpTransport {
    async fn send(&self, body: &Value) -> Result<TransportReply, LlmError> {
        let url = format!("{}?key={}", self.api_url, self.api_key);
        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| LlmError::Http(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| LlmError::Http(e.to_string()))?;

        Ok(TransportReply { status, body })
    }
}

/// The single LLM client used for screening calls.
/// Wraps the Gemini generateContent API with schema-constrained output and
/// a bounded retry loop around the transient-unavailable signal.
#[derive(Clone)]
pub struct GeminiClient {
    transport: Arc<dyn LlmTransport>,
    sleeper: Arc<dyn Sleep>,
}

impl GeminiClient {
    pub fn new(api_key: String, api_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            transport: Arc::new(HttpTransport {
                client,
                api_url,
                api_key,
            }),
            sleeper: Arc::new(TokioSleep),
        }
    }

    /// Assembles the client from explicit parts. Used by tests to swap in a
    /// scripted transport and a recording sleeper.
    pub fn with_parts(transport: Arc<dyn LlmTransport>, sleeper: Arc<dyn Sleep>) -> Self {
        Self { transport, sleeper }
    }

    /// Sends the prompt with a fixed output schema and returns the decoded
    /// JSON object the model produced.
    ///
    /// Retries only on 503 with exponential backoff (1s, 2s, 4s, 8s, 16s),
    /// bounded at five total attempts. A successful HTTP call whose payload
    /// fails to decode is terminal — a structurally malformed answer will not
    /// fix itself on resubmission.
    pub async fn invoke(&self, prompt: &str, response_schema: &Value) -> Result<Value, LlmError> {
        let request = GeminiRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema,
                temperature: TEMPERATURE,
            },
            model: MODEL,
        };
        let body = serde_json::to_value(&request).map_err(|e| LlmError::Parse(e.to_string()))?;

        let mut attempt: u32 = 0;
        loop {
            match self.attempt_once(&body).await {
                Ok(decoded) => return Ok(decoded),
                Err(err) if should_retry(&err, attempt) => {
                    let delay = backoff_delay(attempt);
                    warn!(
                        "LLM attempt {}/{} failed with 503 UNAVAILABLE, retrying in {}s...",
                        attempt + 1,
                        MAX_ATTEMPTS,
                        delay.as_secs()
                    );
                    self.sleeper.sleep(delay).await;
                    attempt += 1;
                }
                Err(err) if err.is_transient() => {
                    // Transient but out of budget.
                    return Err(LlmError::Exhausted {
                        attempts: attempt + 1,
                        last_error: err.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn attempt_once(&self, body: &Value) -> Result<Value, LlmError> {
        let reply = self.transport.send(body).await?;

        if reply.status == 503 {
            return Err(LlmError::Unavailable(reply.body));
        }

        if !(200..300).contains(&reply.status) {
            // Try to surface the structured Gemini error message.
            let message = serde_json::from_str::<GeminiError>(&reply.body)
                .map(|e| e.error.message)
                .unwrap_or(reply.body);
            return Err(LlmError::Api {
                status: reply.status,
                message,
            });
        }

        let envelope: GeminiResponse =
            serde_json::from_str(&reply.body).map_err(|_| LlmError::MalformedEnvelope)?;

        let text = envelope
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.trim())
            .ok_or(LlmError::MalformedEnvelope)?;

        let decoded: Value =
            serde_json::from_str(text).map_err(|e| LlmError::Parse(e.to_string()))?;

        debug!("LLM call succeeded ({} bytes of model output)", text.len());
        Ok(decoded)
    }
}

/// Wraps a JSON-encoded model answer in the Gemini success envelope.
/// Shared with pipeline tests.
#[cfg(test)]
pub fn success_envelope(payload: &Value) -> String {
    serde_json::json!({
        "candidates": [{
            "content": {
                "parts": [{ "text": payload.to_string() }]
            }
        }]
    })
    .to_string()
}

#[cfg(test)]
pub mod test_support {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;

    /// Scripted transport: pops replies in order, repeating the last one if
    /// the script runs out.
    pub struct ScriptedTransport {
        replies: Mutex<Vec<TransportReply>>,
        pub calls: AtomicU32,
    }

    impl ScriptedTransport {
        pub fn new(replies: Vec<TransportReply>) -> Self {
            Self {
                replies: Mutex::new(replies),
                calls: AtomicU32::new(0),
            }
        }

        pub fn call_count(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LlmTransport for ScriptedTransport {
        async fn send(&self, _body: &Value) -> Result<TransportReply, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut replies = self.replies.lock().unwrap();
            if replies.len() > 1 {
                Ok(replies.remove(0))
            } else {
                Ok(replies[0].clone())
            }
        }
    }

    /// Sleeper that records requested delays instead of waiting.
    #[derive(Default)]
    pub struct RecordingSleep {
        pub delays: Mutex<Vec<Duration>>,
    }

    #[async_trait]
    impl Sleep for RecordingSleep {
        async fn sleep(&self, duration: Duration) {
            self.delays.lock().unwrap().push(duration);
        }
    }
}
