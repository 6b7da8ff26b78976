pub mod error;
pub use error::CoreError;
pub mod task;
pub use task::{Task, TaskRef};
pub mod registry;
pub use registry::TaskRegistry;
pub mod log;
pub use log::{EventLog, MemoryLog, Severity, TracingEventLog};
pub mod dispatcher;
pub use dispatcher::Dispatcher;
