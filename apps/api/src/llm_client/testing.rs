//! In-process `TextModel` fakes and a recording `Sleeper` for unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::extractor::{JsonExtractor, RetryPolicy, Sleeper};
use super::{LlmError, ModelResponse, TextModel};

pub type Reply = Result<ModelResponse, LlmError>;

fn failure(message: &str) -> LlmError {
    LlmError::Api {
        status: 500,
        message: message.to_string(),
    }
}

/// Replays a fixed list of replies in order. Once the script runs out every
/// further call fails with a 500.
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Reply>>,
    prompts: Mutex<Vec<String>>,
    hang_first: AtomicUsize,
}

impl ScriptedModel {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
            hang_first: AtomicUsize::new(0),
        }
    }

    pub fn always_failing() -> Self {
        Self::new(Vec::new())
    }

    /// The first `n` calls never resolve; used to exercise call timeouts.
    pub fn with_hang_first(self, n: usize) -> Self {
        self.hang_first.store(n, Ordering::SeqCst);
        self
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextModel for ScriptedModel {
    async fn generate(&self, prompt: &str) -> Result<ModelResponse, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        let hang = self
            .hang_first
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if hang {
            std::future::pending::<()>().await;
        }

        let next = self.replies.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(failure("script exhausted")))
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

/// Answers each prompt with a function of the prompt text. Useful when the
/// call order is not fixed, e.g. concurrent per-resume stages.
pub struct RoutedModel {
    route: Box<dyn Fn(&str) -> Reply + Send + Sync>,
    prompts: Mutex<Vec<String>>,
}

impl RoutedModel {
    pub fn new<F>(route: F) -> Self
    where
        F: Fn(&str) -> Reply + Send + Sync + 'static,
    {
        Self {
            route: Box::new(route),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Prompts containing `marker`.
    pub fn prompts_containing(&self, marker: &str) -> Vec<String> {
        self.prompts()
            .into_iter()
            .filter(|p| p.contains(marker))
            .collect()
    }
}

#[async_trait]
impl TextModel for RoutedModel {
    async fn generate(&self, prompt: &str) -> Result<ModelResponse, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        (self.route)(prompt)
    }

    fn model_name(&self) -> &str {
        "routed"
    }
}

pub fn text_reply(text: impl Into<String>) -> Reply {
    Ok(ModelResponse::from_text(text))
}

pub fn error_reply(message: &str) -> Reply {
    Err(failure(message))
}

/// Records requested sleeps and returns immediately.
#[derive(Default)]
pub struct RecordingSleeper {
    slept: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn slept(&self) -> Vec<Duration> {
        self.slept.lock().unwrap().clone()
    }

    pub fn total(&self) -> Duration {
        self.slept().into_iter().sum()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.slept.lock().unwrap().push(duration);
    }
}

/// Extractor over `model` that never waits between attempts.
pub fn instant_extractor(model: Arc<dyn TextModel>, max_attempts: u32) -> JsonExtractor {
    JsonExtractor::with_sleeper(
        model,
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_secs(1),
            call_timeout: None,
        },
        Arc::new(RecordingSleeper::default()),
    )
}
