use async_trait::async_trait;
use knock_model::{RequestContext, TaskResult};

use crate::error::ApiError;

/// Backend behind the HTTP surface.
///
/// This trait abstracts the task backend, allowing users to:
/// - Use the provided `DispatcherAdapter`
/// - Wrap dispatch with extra logic (auditing, allow-lists, ...)
#[async_trait]
pub trait ApiHandler: Send + Sync + 'static {
    /// Whether a task with this (lower-cased) name is configured.
    fn has_task(&self, name: &str) -> bool;

    /// Run the operation selected by `ctx.action` for `ctx.task`.
    async fn run_task(&self, ctx: RequestContext) -> Result<TaskResult, ApiError>;
}
