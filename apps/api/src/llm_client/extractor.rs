//! Resilient JSON extraction over an unreliable text model.
//!
//! Every pipeline stage goes through `JsonExtractor::extract`. A stage either
//! gets a parsed record back or `None`; it never sees a transport or format
//! error. Network, API, timeout and parse failures are retried with
//! exponential backoff. A reply with no content at all is treated as a
//! refusal and is NOT retried.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::llm_client::{strip_json_fences, LlmError, TextModel};

/// How many times to call the model and how long to wait between calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    /// Upper bound for a single model call. `None` leaves it to the client.
    pub call_timeout: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(1),
            call_timeout: Some(Duration::from_secs(120)),
        }
    }
}

impl RetryPolicy {
    /// Delay after the failed attempt `attempt` (0-indexed): base × 2^attempt.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Abstraction over sleeping so the backoff schedule can be asserted without
/// waiting in real time.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Outcome of one attempt.
enum Attempt<T> {
    Parsed(T),
    Refused(String),
}

#[derive(Clone)]
pub struct JsonExtractor {
    model: Arc<dyn TextModel>,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl JsonExtractor {
    pub fn new(model: Arc<dyn TextModel>, policy: RetryPolicy) -> Self {
        Self::with_sleeper(model, policy, Arc::new(TokioSleeper))
    }

    pub fn with_sleeper(
        model: Arc<dyn TextModel>,
        policy: RetryPolicy,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            model,
            policy,
            sleeper,
        }
    }

    /// Sends `prompt` verbatim and parses the reply into `T`.
    /// Returns `None` on refusal or once every attempt has failed.
    pub async fn extract<T: DeserializeOwned>(&self, prompt: &str) -> Option<T> {
        let max_attempts = self.policy.max_attempts;

        for attempt in 0..max_attempts {
            match self.attempt::<T>(prompt).await {
                Ok(Attempt::Parsed(value)) => {
                    debug!("JSON extraction succeeded on attempt {}", attempt + 1);
                    return Some(value);
                }
                Ok(Attempt::Refused(reason)) => {
                    warn!("Model returned no content ({reason}); giving up without retry");
                    return None;
                }
                Err(e) => {
                    warn!(
                        "An error occurred (Attempt {}/{}): {}",
                        attempt + 1,
                        max_attempts,
                        e
                    );
                    if attempt + 1 < max_attempts {
                        self.sleeper.sleep(self.policy.backoff(attempt)).await;
                    }
                }
            }
        }

        None
    }

    async fn attempt<T: DeserializeOwned>(&self, prompt: &str) -> Result<Attempt<T>, LlmError> {
        let response = match self.policy.call_timeout {
            Some(limit) => tokio::time::timeout(limit, self.model.generate(prompt))
                .await
                .map_err(|_| LlmError::Timeout(limit))??,
            None => self.model.generate(prompt).await?,
        };

        let Some(text) = response.text() else {
            let reason = response
                .block_reason
                .clone()
                .unwrap_or_else(|| "no content".to_string());
            return Ok(Attempt::Refused(reason));
        };

        let value = serde_json::from_str::<T>(strip_json_fences(text))?;
        Ok(Attempt::Parsed(value))
    }
}
