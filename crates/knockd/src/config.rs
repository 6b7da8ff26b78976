use std::{fs, path::Path};

use anyhow::Context;
use knock_model::KnockConfig;

use crate::cli::Cli;

/// Read, override and validate the configuration.
pub fn load(cli: &Cli) -> anyhow::Result<KnockConfig> {
    let mut cfg = read(&cli.config)?;
    apply_overrides(&mut cfg, cli);
    cfg.validate()
        .with_context(|| format!("invalid config {}", cli.config.display()))?;
    Ok(cfg)
}

fn read(path: &Path) -> anyhow::Result<KnockConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    parse(&raw).with_context(|| format!("failed to parse config {}", path.display()))
}

fn parse(raw: &str) -> Result<KnockConfig, serde_json::Error> {
    serde_json::from_str(raw)
}

fn apply_overrides(cfg: &mut KnockConfig, cli: &Cli) {
    if let Some(listen) = cli.listen {
        cfg.listen = listen;
    }
    if let Some(level) = &cli.log_level {
        cfg.log.level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        cfg.log.format = format.clone();
    }
}
