use std::sync::Arc;

use async_trait::async_trait;
use knock_core::Dispatcher;
use knock_model::{RequestContext, TaskResult};

use crate::error::ApiError;
use crate::handler::ApiHandler;

/// Adapter that bridges `Dispatcher` to `ApiHandler`.
pub struct DispatcherAdapter {
    dispatcher: Arc<Dispatcher>,
}

impl DispatcherAdapter {
    /// Create a new adapter wrapping the given dispatcher.
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }
}

#[async_trait]
impl ApiHandler for DispatcherAdapter {
    fn has_task(&self, name: &str) -> bool {
        self.dispatcher.registry().contains(name)
    }

    async fn run_task(&self, ctx: RequestContext) -> Result<TaskResult, ApiError> {
        self.dispatcher.dispatch(&ctx).await.map_err(ApiError::from)
    }
}
