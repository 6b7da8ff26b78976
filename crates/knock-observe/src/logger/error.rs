use thiserror::Error;

/// Failure to set up the process-wide subscriber.
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("unknown log format '{0}' (expected text, json or journald)")]
    InvalidFormat(String),
    #[error("journald output needs Linux and the `journald` feature")]
    JournaldNotSupported,
    #[error("a global subscriber is already installed")]
    AlreadyInitialized,
    #[error("subscriber setup failed: {0}")]
    InitializationFailed(String),
    #[error("invalid log filter '{0}'")]
    InvalidLogLevel(String),
}
