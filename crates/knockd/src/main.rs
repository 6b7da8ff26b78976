use std::{net::SocketAddr, sync::Arc};

use clap::Parser;
use knock_api::{DispatcherAdapter, HttpApi, HttpConfig};
use knock_core::{Dispatcher, EventLog, TracingEventLog};
use knock_observe::{LoggerConfig, logger_init};
use tokio_util::sync::CancellationToken;
use tracing::info;

mod cli;
mod config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1) Config
    let cli = cli::Cli::parse();
    let cfg = config::load(&cli)?;

    // 2) Logger
    logger_init(&LoggerConfig::from_settings(&cfg.log.level, &cfg.log.format)?)?;
    info!(config = %cli.config.display(), "logger initialized");

    // 3) Tasks
    let registry = Arc::new(knock_exec::build_registry(&cfg)?);
    info!(tasks = ?registry.names(), "tasks registered");

    // 4) Dispatcher + HTTP surface
    let log: Arc<dyn EventLog> = Arc::new(TracingEventLog);
    let dispatcher = Arc::new(Dispatcher::new(registry, Arc::clone(&log)));
    let http_cfg = HttpConfig::from_config(&cfg)?;
    let app = HttpApi::new(Arc::new(DispatcherAdapter::new(dispatcher)), http_cfg)
        .with_log(log)
        .router();

    // 5) Serve until Ctrl+C
    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutting down...");
        }
        signal.cancel();
    });

    let listener = tokio::net::TcpListener::bind(cfg.listen).await?;
    info!(listen = %cfg.listen, prefix = %cfg.url_prefix, "knockd is running");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move { shutdown.cancelled().await })
    .await?;

    Ok(())
}
