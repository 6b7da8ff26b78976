use time::{UtcOffset, format_description::well_known::Rfc3339};
use tracing::Subscriber;
use tracing_subscriber::{
    EnvFilter, fmt, fmt::time::OffsetTime, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::logger::{config::LoggerConfig, error::LoggerError, format::LoggerFormat};

/// Environment variable that replaces the configured filter when set.
pub const LOG_ENV: &str = "KNOCK_LOG";

pub(crate) fn init(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    let filter = mk_filter(&cfg.level, std::env::var(LOG_ENV).ok().as_deref())?;
    let registry = tracing_subscriber::registry().with(filter);

    match cfg.format {
        LoggerFormat::Text => init_with(
            registry.with(
                fmt::layer()
                    .with_ansi(cfg.use_color)
                    .with_target(cfg.with_targets)
                    .with_timer(mk_timer()),
            ),
        ),
        LoggerFormat::Json => init_with(
            registry.with(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_target(cfg.with_targets)
                    .with_timer(mk_timer()),
            ),
        ),
        LoggerFormat::Journald => init_journald(registry),
    }
}

/// `env` wins over `level` when non-empty.
fn mk_filter(level: &str, env: Option<&str>) -> Result<EnvFilter, LoggerError> {
    let directives = match env.map(str::trim) {
        Some(env) if !env.is_empty() => env,
        _ => level,
    };
    EnvFilter::try_new(directives).map_err(|_| LoggerError::InvalidLogLevel(directives.to_string()))
}

fn mk_timer() -> OffsetTime<Rfc3339> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetTime::new(offset, Rfc3339)
}

fn init_with<S>(subscriber: S) -> Result<(), LoggerError>
where
    S: Subscriber + Send + Sync + 'static,
{
    subscriber.try_init().map_err(|e| {
        let s = e.to_string();
        if s.contains("SetGlobalDefaultError") || s.contains("global default") {
            LoggerError::AlreadyInitialized
        } else {
            LoggerError::InitializationFailed(s)
        }
    })
}

#[cfg(all(target_os = "linux", feature = "journald"))]
fn init_journald<S>(registry: S) -> Result<(), LoggerError>
where
    S: Subscriber + Send + Sync + 'static + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    let journald = tracing_journald::layer()
        .map_err(|e| LoggerError::InitializationFailed(format!("journald: {e}")))?;
    init_with(registry.with(journald))
}

#[cfg(not(all(target_os = "linux", feature = "journald")))]
fn init_journald<S>(_registry: S) -> Result<(), LoggerError> {
    Err(LoggerError::JournaldNotSupported)
}
