//! Storage traits for reports and generation-request audit entries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::traits::textgen::TokenUsage;
use crate::types::report::Report;

/// Outcome recorded on an audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    Succeeded,
    Failed,
}

/// A generation-request audit entry.
///
/// One entry per text-generation attempt, successful or not, so every
/// attempt leaves a trace with its token cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Uuid,

    /// Request kind, e.g. "cma_insights"
    pub kind: String,

    pub report_id: Uuid,
    pub website_id: Uuid,

    /// Hex digest of the prompt sent
    pub prompt_hash: String,

    /// Structured snapshot of the request inputs
    pub input_snapshot: serde_json::Value,

    pub usage: TokenUsage,
    pub status: AuditStatus,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(
        kind: impl Into<String>,
        report_id: Uuid,
        website_id: Uuid,
        prompt_hash: String,
        input_snapshot: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: kind.into(),
            report_id,
            website_id,
            prompt_hash,
            input_snapshot,
            usage: TokenUsage::default(),
            status: AuditStatus::Failed,
            error: None,
            created_at: Utc::now(),
        }
    }

    pub fn succeeded(mut self, usage: TokenUsage) -> Self {
        self.status = AuditStatus::Succeeded;
        self.usage = usage;
        self.error = None;
        self
    }

    pub fn failed(mut self, error: impl Into<String>) -> Self {
        self.status = AuditStatus::Failed;
        self.error = Some(error.into());
        self
    }
}

/// Persistence for report entities.
#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn insert_report(&self, report: &Report) -> Result<()>;

    /// Replace the stored report by id.
    async fn update_report(&self, report: &Report) -> Result<()>;

    async fn get_report(&self, id: Uuid) -> Result<Option<Report>>;
}

/// Sink for generation-request audit entries.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record_audit(&self, entry: &AuditEntry) -> Result<()>;
}

#[async_trait]
impl<T: ReportStore + ?Sized> ReportStore for std::sync::Arc<T> {
    async fn insert_report(&self, report: &Report) -> Result<()> {
        (**self).insert_report(report).await
    }

    async fn update_report(&self, report: &Report) -> Result<()> {
        (**self).update_report(report).await
    }

    async fn get_report(&self, id: Uuid) -> Result<Option<Report>> {
        (**self).get_report(id).await
    }
}

#[async_trait]
impl<T: AuditSink + ?Sized> AuditSink for std::sync::Arc<T> {
    async fn record_audit(&self, entry: &AuditEntry) -> Result<()> {
        (**self).record_audit(entry).await
    }
}
