//! Text-generation trait for the narrative step.
//!
//! Implementations wrap specific LLM providers and handle transport;
//! prompting and response parsing stay in the pipeline.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::TextGenResult;

/// Token accounting reported by the provider, recorded on audit entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// A completed text-generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    /// Raw text response; not guaranteed to be pure JSON
    pub content: String,
    pub usage: TokenUsage,
}

/// A text-generation collaborator.
///
/// Errors follow the pipeline's failure taxonomy: `Config` and
/// `RateLimited` are systemic and interrupt the caller, everything else
/// is recoverable per-report.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send a prompt to the given model and return the raw completion.
    async fn send(&self, prompt: &str, model: &str) -> TextGenResult<Completion>;
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for std::sync::Arc<T> {
    async fn send(&self, prompt: &str, model: &str) -> TextGenResult<Completion> {
        (**self).send(prompt, model).await
    }
}
