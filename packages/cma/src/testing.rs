//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the CMA pipeline
//! without making real LLM or network calls.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::error::{CmaError, Result, TextGenError, TextGenResult};
use crate::traits::renderer::DocumentRenderer;
use crate::traits::textgen::{Completion, TextGenerator, TokenUsage};

/// A scripted reply for [`MockTextGenerator`].
#[derive(Debug, Clone)]
enum ScriptedReply {
    Content(String),
    ConfigError(String),
    RateLimited,
    Error(String),
}

/// Record of a call made to the mock text generator.
#[derive(Debug, Clone)]
pub struct TextGenCall {
    pub prompt: String,
    pub model: String,
}

/// A mock text-generation service with scripted replies.
///
/// Replies are consumed in order; when the script runs out, the last
/// reply repeats. With no script at all, every call fails with a config
/// error.
#[derive(Default, Clone)]
pub struct MockTextGenerator {
    script: Arc<RwLock<VecDeque<ScriptedReply>>>,
    calls: Arc<RwLock<Vec<TextGenCall>>>,
}

impl MockTextGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a successful completion with the given content.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.push(ScriptedReply::Content(content.into()));
        self
    }

    /// Script a configuration error (systemic, propagates).
    pub fn with_config_error(self, message: impl Into<String>) -> Self {
        self.push(ScriptedReply::ConfigError(message.into()));
        self
    }

    /// Script a rate-limit error (systemic, propagates).
    pub fn with_rate_limit(self) -> Self {
        self.push(ScriptedReply::RateLimited);
        self
    }

    /// Script a generic provider error (recoverable).
    pub fn with_error(self, message: impl Into<String>) -> Self {
        self.push(ScriptedReply::Error(message.into()));
        self
    }

    /// All calls made to this mock.
    pub fn calls(&self) -> Vec<TextGenCall> {
        self.calls.read().unwrap().clone()
    }

    fn push(&self, reply: ScriptedReply) {
        self.script.write().unwrap().push_back(reply);
    }

    fn next_reply(&self) -> Option<ScriptedReply> {
        let mut script = self.script.write().unwrap();
        if script.len() > 1 {
            script.pop_front()
        } else {
            script.front().cloned()
        }
    }
}

#[async_trait]
impl TextGenerator for MockTextGenerator {
    async fn send(&self, prompt: &str, model: &str) -> TextGenResult<Completion> {
        self.calls.write().unwrap().push(TextGenCall {
            prompt: prompt.to_string(),
            model: model.to_string(),
        });

        match self.next_reply() {
            Some(ScriptedReply::Content(content)) => Ok(Completion {
                content,
                usage: TokenUsage {
                    input_tokens: 100,
                    output_tokens: 50,
                },
            }),
            Some(ScriptedReply::ConfigError(message)) => Err(TextGenError::Config(message)),
            Some(ScriptedReply::RateLimited) => Err(TextGenError::RateLimited),
            Some(ScriptedReply::Error(message)) => Err(TextGenError::Other(message)),
            None => Err(TextGenError::Config("mock has no scripted replies".into())),
        }
    }
}

/// A mock document renderer that records enqueued reports.
#[derive(Default, Clone)]
pub struct MockRenderer {
    enqueued: Arc<RwLock<Vec<(Uuid, Uuid)>>>,
    fail: Arc<RwLock<bool>>,
}

impl MockRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every enqueue fail, to exercise fire-and-forget handling.
    pub fn failing(self) -> Self {
        *self.fail.write().unwrap() = true;
        self
    }

    /// All (report_id, website_id) pairs enqueued so far.
    pub fn enqueued(&self) -> Vec<(Uuid, Uuid)> {
        self.enqueued.read().unwrap().clone()
    }
}

#[async_trait]
impl DocumentRenderer for MockRenderer {
    async fn enqueue_render(&self, report_id: Uuid, website_id: Uuid) -> Result<()> {
        if *self.fail.read().unwrap() {
            return Err(CmaError::Render("render queue unavailable".into()));
        }
        self.enqueued.write().unwrap().push((report_id, website_id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_replies_are_consumed_in_order_and_last_repeats() {
        let textgen = MockTextGenerator::new()
            .with_response("first")
            .with_response("second");

        let first = textgen.send("p", "m").await.unwrap();
        assert_eq!(first.content, "first");
        let second = textgen.send("p", "m").await.unwrap();
        assert_eq!(second.content, "second");
        let third = textgen.send("p", "m").await.unwrap();
        assert_eq!(third.content, "second");

        assert_eq!(textgen.calls().len(), 3);
    }

    #[tokio::test]
    async fn unscripted_mock_fails_with_config_error() {
        let textgen = MockTextGenerator::new();
        let err = textgen.send("p", "m").await.unwrap_err();
        assert!(matches!(err, TextGenError::Config(_)));
    }

    #[tokio::test]
    async fn renderer_records_and_can_fail() {
        let renderer = MockRenderer::new();
        let report_id = Uuid::new_v4();
        let website_id = Uuid::new_v4();
        renderer.enqueue_render(report_id, website_id).await.unwrap();
        assert_eq!(renderer.enqueued(), vec![(report_id, website_id)]);

        let failing = MockRenderer::new().failing();
        assert!(failing.enqueue_render(report_id, website_id).await.is_err());
    }
}
