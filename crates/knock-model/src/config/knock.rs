use std::{
    collections::{BTreeMap, HashSet},
    net::SocketAddr,
};

use serde::{Deserialize, Serialize};

use crate::{ConfigError, TaskName};

/// Process-wide configuration, read-only once loaded.
///
/// Legacy PascalCase keys (`UrlPrefix`, `ExplicitIP`, `RealIPHeader`, `TimeHandler`, `Tasks`) are accepted as aliases.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KnockConfig {
    /// Address the HTTP server binds to.
    pub listen: SocketAddr,
    /// Prefix stripped from incoming paths before task lookup.
    #[serde(alias = "UrlPrefix")]
    pub url_prefix: String,
    /// Trust the `ip` query parameter over the connection's source address.
    #[serde(alias = "ExplicitIP")]
    pub explicit_ip: bool,
    /// Header carrying the real client IP behind a reverse proxy. Empty disables it.
    #[serde(alias = "RealIPHeader")]
    pub real_ip_header: String,
    /// Header carrying the TTL when the default one is absent. Empty disables it.
    #[serde(alias = "TimeHandler")]
    pub time_handler: String,
    pub log: LogSettings,
    #[serde(alias = "Tasks")]
    pub tasks: BTreeMap<TaskName, TaskSpec>,
}

impl Default for KnockConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 8080)),
            url_prefix: String::new(),
            explicit_ip: false,
            real_ip_header: String::new(),
            time_handler: String::new(),
            log: LogSettings::default(),
            tasks: BTreeMap::new(),
        }
    }
}

impl KnockConfig {
    /// Structural checks that do not need the HTTP stack.
    ///
    /// Header names are checked when the HTTP layer parses them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.url_prefix.is_empty() && !self.url_prefix.starts_with('/') {
            return Err(ConfigError::InvalidPrefix(self.url_prefix.clone()));
        }

        let mut seen = HashSet::new();
        for (name, spec) in &self.tasks {
            if name.is_empty() {
                return Err(ConfigError::EmptyTaskName);
            }
            if name.contains('/') {
                return Err(ConfigError::InvalidTaskName(name.clone()));
            }
            if !seen.insert(name.to_lowercase()) {
                return Err(ConfigError::DuplicateTask(name.clone()));
            }
            if spec.start.program.trim().is_empty() {
                return Err(ConfigError::EmptyProgram {
                    task: name.clone(),
                    op: "start",
                });
            }
            if spec.stop.program.trim().is_empty() {
                return Err(ConfigError::EmptyProgram {
                    task: name.clone(),
                    op: "stop",
                });
            }
        }
        Ok(())
    }
}

/// Logger settings as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub level: String,
    /// `text`, `json` or `journald`.
    pub format: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

/// Descriptor of one configured task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSpec {
    /// Identifier used in logs. Defaults to the task name when empty.
    #[serde(default, alias = "ID")]
    pub id: String,
    pub start: CommandSpec,
    pub stop: CommandSpec,
    /// Upper bound for one start/stop invocation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

/// Program invocation with `{ip}`, `{ttl}` and `{task}` placeholders in args and env values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub program: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: BTreeMap::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }
}
