use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("task name cannot be empty")]
    EmptyTaskName,
    #[error("invalid task name '{0}': must not contain '/'")]
    InvalidTaskName(String),
    #[error("duplicate task '{0}' (names are case-insensitive)")]
    DuplicateTask(String),
    #[error("task '{task}': {op} program is empty")]
    EmptyProgram { task: String, op: &'static str },
    #[error("invalid header name for {field}: '{value}'")]
    InvalidHeader { field: &'static str, value: String },
    #[error("invalid url prefix '{0}': must start with '/'")]
    InvalidPrefix(String),
}
