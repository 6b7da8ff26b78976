mod config;
mod error;
mod format;
mod log;

pub use config::LoggerConfig;
pub use error::LoggerError;
pub use format::LoggerFormat;
pub use log::LOG_ENV;

/// Install the process-wide subscriber. Fails if one is already installed.
///
/// A non-empty `KNOCK_LOG` replaces `cfg.level`.
pub fn logger_init(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    log::init(cfg)
}
