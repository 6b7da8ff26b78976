use std::sync::Arc;

use knock_core::TaskRegistry;
use knock_model::KnockConfig;
use tracing::debug;

use crate::{command::CommandTask, error::ExecError};

/// Turn the configured task table into a registry of [`CommandTask`]s.
pub fn build_registry(cfg: &KnockConfig) -> Result<TaskRegistry, ExecError> {
    let mut registry = TaskRegistry::new();
    for (name, spec) in &cfg.tasks {
        let task = CommandTask::from_spec(name, spec)?;
        registry.register(name, Arc::new(task))?;
    }
    debug!(tasks = registry.len(), "task registry built");
    Ok(registry)
}
