use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("unknown task: {0}")]
    UnknownTask(String),
    #[error("task '{0}' is already registered")]
    DuplicateTask(String),
}
