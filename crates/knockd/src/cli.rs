use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;

/// HTTP-triggered start/stop of configured tasks for the calling client.
#[derive(Debug, Parser)]
#[command(name = "knockd", version, about)]
pub struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, default_value = "/etc/knockd/config.json")]
    pub config: PathBuf,

    /// Override the listen address from the config file.
    #[arg(long)]
    pub listen: Option<SocketAddr>,

    /// Override the log filter (e.g. `info`, `knock_api=debug`).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Override the log format: text, json or journald.
    #[arg(long)]
    pub log_format: Option<String>,
}
