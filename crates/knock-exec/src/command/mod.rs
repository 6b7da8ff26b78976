use std::{net::IpAddr, time::Duration};

use async_trait::async_trait;
use knock_core::Task;
use knock_model::{CommandSpec, TaskResult, TaskSpec, Ttl};
use tracing::{debug, trace};

use crate::{
    error::ExecError,
    util::{Vars, cmd_program},
};

/// Retcode reported when the program could not produce an exit code of its own.
const NO_EXIT_CODE: i32 = -1;

/// Task backed by two external programs: one to start, one to stop.
///
/// `{ip}`, `{ttl}` and `{task}` in arguments and env values are replaced per call.
/// A non-zero exit becomes a failed [`TaskResult`] carrying the exit code and stderr.
#[derive(Debug, Clone)]
pub struct CommandTask {
    name: String,
    id: String,
    start: CommandSpec,
    stop: CommandSpec,
    timeout: Option<Duration>,
}

impl CommandTask {
    pub fn new(name: impl Into<String>, start: CommandSpec, stop: CommandSpec) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            start,
            stop,
            timeout: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build from a configured task. An empty `id` falls back to the task name.
    pub fn from_spec(name: &str, spec: &TaskSpec) -> Result<Self, ExecError> {
        for (op, cmd) in [("start", &spec.start), ("stop", &spec.stop)] {
            if cmd.program.trim().is_empty() {
                return Err(ExecError::MissingProgram {
                    task: name.to_string(),
                    op,
                });
            }
        }

        let mut task = Self::new(name, spec.start.clone(), spec.stop.clone());
        if !spec.id.is_empty() {
            task = task.with_id(spec.id.clone());
        }
        if let Some(ms) = spec.timeout_ms {
            task = task.with_timeout(Duration::from_millis(ms));
        }
        Ok(task)
    }

    async fn run(&self, op: &'static str, spec: &CommandSpec, vars: Vars<'_>) -> TaskResult {
        let mut cmd = cmd_program(spec, &vars);
        trace!(target: "knock.exec", task = %self.id, op, program = %spec.program, "spawn");

        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => return TaskResult::failed(NO_EXIT_CODE, format!("spawn: {e}")),
        };

        // dropping the wait future on timeout kills the child (kill_on_drop)
        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(output) => output,
                Err(_) => {
                    debug!(target: "knock.exec", task = %self.id, op, "timed out; child killed");
                    return TaskResult::failed(
                        NO_EXIT_CODE,
                        format!("timed out after {}ms", limit.as_millis()),
                    );
                }
            },
            None => child.wait_with_output().await,
        };

        let output = match output {
            Ok(output) => output,
            Err(e) => return TaskResult::failed(NO_EXIT_CODE, format!("wait: {e}")),
        };

        if output.status.success() {
            debug!(target: "knock.exec", task = %self.id, op, "exit success");
            return TaskResult::ok();
        }

        match output.status.code() {
            Some(code) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let stderr = stderr.trim();
                debug!(target: "knock.exec", task = %self.id, op, code, "exit non-zero");
                if stderr.is_empty() {
                    TaskResult::failed(code, format!("exit code: {code}"))
                } else {
                    TaskResult::failed(code, stderr)
                }
            }
            None => TaskResult::failed(NO_EXIT_CODE, "terminated by signal"),
        }
    }
}

#[async_trait]
impl Task for CommandTask {
    fn id(&self) -> &str {
        &self.id
    }

    async fn start(&self, ip: IpAddr, ttl: Ttl) -> TaskResult {
        let vars = Vars {
            task: &self.name,
            ip,
            ttl: Some(ttl),
        };
        self.run("start", &self.start, vars).await
    }

    async fn stop(&self, ip: IpAddr) -> TaskResult {
        let vars = Vars {
            task: &self.name,
            ip,
            ttl: None,
        };
        self.run("stop", &self.stop, vars).await
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> CommandSpec {
        CommandSpec::new("sh").with_args(["-c", script])
    }

    fn ip() -> IpAddr {
        "203.0.113.5".parse().unwrap()
    }

    #[tokio::test]
    async fn zero_exit_is_success() {
        let task = CommandTask::new("vpn", sh("exit 0"), sh("exit 0"));
        let res = task.start(ip(), 60).await;
        assert!(res.is_success());
        assert!(res.err().is_empty());
    }

    #[tokio::test]
    async fn non_zero_exit_carries_code_and_stderr() {
        let start = sh("echo 'set vpn missing' >&2; exit 3");
        let task = CommandTask::new("vpn", start, sh("exit 0"));
        let res = task.start(ip(), 60).await;
        assert_eq!(res.retcode(), 3);
        assert_eq!(res.err(), "set vpn missing");
    }

    #[tokio::test]
    async fn silent_failure_reports_exit_code() {
        let task = CommandTask::new("vpn", sh("exit 0"), sh("exit 7"));
        let res = task.stop(ip()).await;
        assert_eq!(res.retcode(), 7);
        assert_eq!(res.err(), "exit code: 7");
    }

    #[tokio::test]
    async fn placeholders_reach_the_program() {
        let script = r#"test "$1" = 203.0.113.5 && test "$2" = 120 && test "$TASK" = vpn"#;
        let start = CommandSpec::new("sh")
            .with_args(["-c", script, "sh", "{ip}", "{ttl}"])
            .with_env("TASK", "{task}");
        let task = CommandTask::new("vpn", start, sh("exit 0"));

        assert!(task.start(ip(), 120).await.is_success());
    }

    #[tokio::test]
    async fn spawn_failure_is_reported() {
        let task = CommandTask::new(
            "vpn",
            CommandSpec::new("/nonexistent/knock-helper"),
            sh("exit 0"),
        );
        let res = task.start(ip(), 1).await;
        assert_eq!(res.retcode(), NO_EXIT_CODE);
        assert!(res.err().starts_with("spawn:"));
    }

    #[tokio::test]
    async fn timeout_kills_the_child() {
        let task = CommandTask::new("vpn", sh("sleep 5"), sh("exit 0"))
            .with_timeout(Duration::from_millis(50));
        let res = task.start(ip(), 1).await;
        assert_eq!(res.retcode(), NO_EXIT_CODE);
        assert_eq!(res.err(), "timed out after 50ms");
    }

    #[test]
    fn from_spec_defaults_id_to_name() {
        let spec = TaskSpec {
            id: String::new(),
            start: sh("exit 0"),
            stop: sh("exit 0"),
            timeout_ms: Some(250),
        };
        let task = CommandTask::from_spec("ssh", &spec).unwrap();
        assert_eq!(task.id(), "ssh");
        assert_eq!(task.timeout, Some(Duration::from_millis(250)));
    }

    #[test]
    fn from_spec_rejects_empty_program() {
        let spec = TaskSpec {
            id: "x".into(),
            start: sh("exit 0"),
            stop: CommandSpec::new(""),
            timeout_ms: None,
        };
        assert!(matches!(
            CommandTask::from_spec("ssh", &spec),
            Err(ExecError::MissingProgram { op: "stop", .. })
        ));
    }
}
