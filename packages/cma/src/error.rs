//! Typed errors for the CMA pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;

/// Errors that can occur during CMA report generation.
#[derive(Debug, Error)]
pub enum CmaError {
    /// Text-generation service failed
    #[error("text generation error: {0}")]
    TextGen(#[from] TextGenError),

    /// Report or audit storage operation failed
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Candidate inventory query failed
    #[error("inventory error: {0}")]
    Inventory(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Document-render enqueue failed
    #[error("render enqueue error: {0}")]
    Render(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Invalid input provided to the pipeline
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl CmaError {
    /// Whether this error represents a systemic condition (credentials,
    /// capacity) rather than a per-report problem.
    ///
    /// Systemic errors propagate out of the orchestrator after the report
    /// is rolled back to draft, so the caller can retry the same report.
    pub fn is_systemic(&self) -> bool {
        matches!(self, CmaError::TextGen(e) if e.is_systemic())
    }
}

/// Errors raised by text-generation collaborators.
#[derive(Debug, Error)]
pub enum TextGenError {
    /// Missing or invalid credentials
    #[error("text generation config error: {0}")]
    Config(String),

    /// Provider rate limit exceeded
    #[error("text generation rate limit exceeded")]
    RateLimited,

    /// HTTP transport failure
    #[error("text generation HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Any other provider-side failure
    #[error("text generation failed: {0}")]
    Other(String),
}

impl TextGenError {
    /// Config and rate-limit errors interrupt the caller; everything else
    /// is recoverable per-report.
    pub fn is_systemic(&self) -> bool {
        matches!(self, TextGenError::Config(_) | TextGenError::RateLimited)
    }
}

/// Result type alias for CMA operations.
pub type Result<T> = std::result::Result<T, CmaError>;

/// Result type alias for text-generation operations.
pub type TextGenResult<T> = std::result::Result<T, TextGenError>;
