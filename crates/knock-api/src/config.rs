use std::str::FromStr;

use axum::http::HeaderName;
use knock_model::{ConfigError, KnockConfig};

/// Request-time view of [`KnockConfig`], parsed once at startup.
#[derive(Debug, Clone, Default)]
pub struct HttpConfig {
    /// Lower-cased prefix without a trailing `/`. Empty means none.
    pub url_prefix: String,
    pub explicit_ip: bool,
    pub real_ip_header: Option<HeaderName>,
    pub time_handler: Option<HeaderName>,
}

impl HttpConfig {
    pub fn from_config(cfg: &KnockConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            url_prefix: cfg.url_prefix.trim_end_matches('/').to_lowercase(),
            explicit_ip: cfg.explicit_ip,
            real_ip_header: parse_header("real_ip_header", &cfg.real_ip_header)?,
            time_handler: parse_header("time_handler", &cfg.time_handler)?,
        })
    }
}

fn parse_header(field: &'static str, value: &str) -> Result<Option<HeaderName>, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    HeaderName::from_str(value)
        .map(Some)
        .map_err(|_| ConfigError::InvalidHeader {
            field,
            value: value.to_string(),
        })
}
