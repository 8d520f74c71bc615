//! OpenAI implementation of the `TextGenerator` trait.
//!
//! A reference implementation using the chat-completions API.
//!
//! # Example
//!
//! ```rust,ignore
//! use cma::ai::OpenAiTextGenerator;
//!
//! let textgen = OpenAiTextGenerator::from_env()?;
//! let orchestrator = ReportOrchestrator::new(inventory, store, textgen, renderer);
//! ```

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::{TextGenError, TextGenResult};
use crate::traits::textgen::{Completion, TextGenerator, TokenUsage};

/// OpenAI-backed text generation.
#[derive(Clone)]
pub struct OpenAiTextGenerator {
    client: Client,
    api_key: SecretString,
    base_url: String,
}

impl OpenAiTextGenerator {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: SecretString::from(api_key.into()),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    /// Create from environment variable `OPENAI_API_KEY`.
    pub fn from_env() -> TextGenResult<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| TextGenError::Config("OPENAI_API_KEY not set".into()))?;
        if api_key.trim().is_empty() {
            return Err(TextGenError::Config("OPENAI_API_KEY is empty".into()));
        }
        Ok(Self::new(api_key))
    }

    /// Set a custom base URL (for Azure, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

#[async_trait]
impl TextGenerator for OpenAiTextGenerator {
    async fn send(&self, prompt: &str, model: &str) -> TextGenResult<Completion> {
        let request = ChatRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.3,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| TextGenError::Http(Box::new(e)))?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(TextGenError::RateLimited);
        }
        if status.as_u16() == 401 || status.as_u16() == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(TextGenError::Config(format!(
                "authentication rejected: {body}"
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TextGenError::Other(format!("HTTP {status}: {body}")));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| TextGenError::Other(e.to_string()))?;

        let usage = chat
            .usage
            .map(|u| TokenUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        let content = chat
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| TextGenError::Other("no choices in response".into()))?;

        Ok(Completion { content, usage })
    }
}
