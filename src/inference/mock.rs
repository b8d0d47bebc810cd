//! # Mock Text Generator for Testing
//!
//! Provides a `MockGenerator` that implements `TextGenerator` without any
//! network access. Replies are scripted in order; once the script is drained
//! the default reply is used for every further call. Calls and prompts are
//! recorded so tests can assert how often the model was consulted.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Mutex;

use super::{GenerationParams, TextGenerator};
use crate::error::{Error, Result};

/// One scripted answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    /// Succeed with this text
    Text(String),
    /// Fail with an API error carrying this message
    Failure(String),
}

impl MockReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(message.into())
    }
}

/// A scripted text generator
///
/// Clones share the same script and counters.
#[derive(Debug, Clone)]
pub struct MockGenerator {
    script: Arc<Mutex<VecDeque<MockReply>>>,
    default_reply: MockReply,
    calls: Arc<AtomicUsize>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockGenerator {
    /// A generator that answers every prompt with `default_reply`
    pub fn new(default_reply: MockReply) -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            default_reply,
            calls: Arc::new(AtomicUsize::new(0)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Always succeed with `text`
    pub fn replying(text: impl Into<String>) -> Self {
        Self::new(MockReply::text(text))
    }

    /// Always fail with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(MockReply::failure(message))
    }

    /// Play `replies` in order before falling back to the default reply
    pub fn with_script(self, replies: impl IntoIterator<Item = MockReply>) -> Self {
        let script = replies.into_iter().collect();
        Self {
            script: Arc::new(Mutex::new(script)),
            ..self
        }
    }

    /// Number of `generate` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received so far, oldest first
    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::replying("")
    }
}

impl TextGenerator for MockGenerator {
    async fn generate(&self, prompt: &str, _params: &GenerationParams) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().await.push(prompt.to_string());

        let reply = {
            let mut script = self.script.lock().await;
            script.pop_front()
        }
        .unwrap_or_else(|| self.default_reply.clone());

        match reply {
            MockReply::Text(text) => Ok(text),
            MockReply::Failure(message) => Err(Error::Api {
                status_code: 503,
                message,
            }),
        }
    }
}
