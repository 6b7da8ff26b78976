use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecError {
    #[error("task '{task}': {op} program is empty")]
    MissingProgram { task: String, op: &'static str },
    #[error("registry error: {0}")]
    Registry(#[from] knock_core::CoreError),
}
