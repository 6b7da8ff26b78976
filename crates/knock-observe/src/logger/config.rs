use std::io::IsTerminal;

use crate::logger::{error::LoggerError, format::LoggerFormat};

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    pub level: String,
    pub with_targets: bool,
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        let use_color = cfg!(test) || std::io::stdout().is_terminal();
        Self {
            format: LoggerFormat::Text,
            level: "info".to_string(),
            with_targets: true,
            use_color,
        }
    }
}

impl LoggerConfig {
    /// Build from the textual `level` / `format` pair found in config files.
    pub fn from_settings(level: &str, format: &str) -> Result<Self, LoggerError> {
        Ok(Self {
            format: format.parse()?,
            level: level.trim().to_string(),
            ..Default::default()
        })
    }
}
