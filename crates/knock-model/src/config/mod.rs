mod error;
pub use error::ConfigError;

mod knock;
pub use knock::{CommandSpec, KnockConfig, LogSettings, TaskSpec};
