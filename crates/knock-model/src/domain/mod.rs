mod task_result;
pub use task_result::TaskResult;

mod action;
pub use action::Action;

mod context;
pub use context::RequestContext;

/// Name of a task as it appears in the request path.
///
/// Task names are matched case-insensitively, so registries store them lower-cased.
pub type TaskName = String;

/// Time-to-live carried by a request.
///
/// The unit is defined by the task that consumes it.
pub type Ttl = u16;
