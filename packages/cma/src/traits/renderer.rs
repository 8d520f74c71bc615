//! Document-rendering collaborator.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;

/// Fire-and-forget enqueue of a completed report for document rendering.
///
/// The pipeline never waits on render completion; a failed enqueue is
/// logged and dropped.
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    async fn enqueue_render(&self, report_id: Uuid, website_id: Uuid) -> Result<()>;
}

#[async_trait]
impl<T: DocumentRenderer + ?Sized> DocumentRenderer for std::sync::Arc<T> {
    async fn enqueue_render(&self, report_id: Uuid, website_id: Uuid) -> Result<()> {
        (**self).enqueue_render(report_id, website_id).await
    }
}
