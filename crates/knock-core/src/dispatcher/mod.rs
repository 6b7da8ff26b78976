use std::sync::Arc;

use knock_model::{Action, RequestContext, TaskResult};
use tracing::{debug, instrument};

use crate::{error::CoreError, log::EventLog, registry::TaskRegistry};

/// Resolves the requested task and invokes the operation selected by the action.
pub struct Dispatcher {
    registry: Arc<TaskRegistry>,
    log: Arc<dyn EventLog>,
}

impl Dispatcher {
    pub fn new(registry: Arc<TaskRegistry>, log: Arc<dyn EventLog>) -> Self {
        Self { registry, log }
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    /// Run the task operation for a fully resolved request.
    ///
    /// An unknown task is reported before anything is invoked.
    #[instrument(level = "debug", skip(self, ctx), fields(task = %ctx.task, action = %ctx.action))]
    pub async fn dispatch(&self, ctx: &RequestContext) -> Result<TaskResult, CoreError> {
        let task = self
            .registry
            .get(&ctx.task)
            .ok_or_else(|| CoreError::UnknownTask(ctx.task.clone()))?;
        let id = task.id();

        let result = match ctx.action {
            Action::Start => {
                self.log.info(&format!(
                    "Starting '{id}' for {}, ttl {}",
                    ctx.ip, ctx.ttl
                ));
                task.start(ctx.ip, ctx.ttl).await
            }
            Action::Stop => {
                self.log
                    .info(&format!("Stopping '{id}' for {} by request...", ctx.ip));
                task.stop(ctx.ip).await
            }
            Action::Unspecified => {
                self.log.info(&format!(
                    "No action specified, so starting '{id}' for {} and ttl {}",
                    ctx.ip, ctx.ttl
                ));
                task.start(ctx.ip, ctx.ttl).await
            }
        };

        if !result.is_success() {
            self.log
                .err(&format!("Failed to execute task '{id}': {}", result.err()));
        }
        debug!(retcode = result.retcode(), "task operation finished");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        net::IpAddr,
        sync::{Arc, Mutex},
    };

    use async_trait::async_trait;
    use knock_model::{Action, RequestContext, TaskResult};

    use super::*;
    use crate::{MemoryLog, Severity, Task};

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Start(IpAddr, u16),
        Stop(IpAddr),
    }

    struct Recording {
        calls: Mutex<Vec<Call>>,
        result: TaskResult,
    }

    impl Recording {
        fn new(result: TaskResult) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                result,
            })
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Task for Recording {
        fn id(&self) -> &str {
            "vpn-access"
        }
        async fn start(&self, ip: IpAddr, ttl: u16) -> TaskResult {
            self.calls.lock().unwrap().push(Call::Start(ip, ttl));
            self.result.clone()
        }
        async fn stop(&self, ip: IpAddr) -> TaskResult {
            self.calls.lock().unwrap().push(Call::Stop(ip));
            self.result.clone()
        }
    }

    fn setup(result: TaskResult) -> (Dispatcher, Arc<Recording>, Arc<MemoryLog>) {
        let task = Recording::new(result);
        let mut reg = TaskRegistry::new();
        reg.register("vpn", task.clone()).unwrap();
        let log = Arc::new(MemoryLog::new());
        (Dispatcher::new(Arc::new(reg), log.clone()), task, log)
    }

    fn ctx(task: &str, action: Action) -> RequestContext {
        RequestContext {
            task: task.to_string(),
            action,
            ip: "203.0.113.5".parse().unwrap(),
            ttl: 120,
        }
    }

    #[tokio::test]
    async fn on_invokes_start() {
        let (d, task, log) = setup(TaskResult::ok());
        let res = d.dispatch(&ctx("vpn", Action::Start)).await.unwrap();

        assert!(res.is_success());
        let ip: IpAddr = "203.0.113.5".parse().unwrap();
        assert_eq!(task.calls(), vec![Call::Start(ip, 120)]);
        assert_eq!(
            log.messages(Severity::Info),
            vec!["Starting 'vpn-access' for 203.0.113.5, ttl 120"]
        );
        assert!(log.messages(Severity::Err).is_empty());
    }

    #[tokio::test]
    async fn off_invokes_stop() {
        let (d, task, log) = setup(TaskResult::ok());
        d.dispatch(&ctx("vpn", Action::Stop)).await.unwrap();

        let ip: IpAddr = "203.0.113.5".parse().unwrap();
        assert_eq!(task.calls(), vec![Call::Stop(ip)]);
        assert_eq!(
            log.messages(Severity::Info),
            vec!["Stopping 'vpn-access' for 203.0.113.5 by request..."]
        );
    }

    #[tokio::test]
    async fn unspecified_action_starts() {
        let (d, task, log) = setup(TaskResult::ok());
        d.dispatch(&ctx("vpn", Action::Unspecified)).await.unwrap();

        let ip: IpAddr = "203.0.113.5".parse().unwrap();
        assert_eq!(task.calls(), vec![Call::Start(ip, 120)]);
        assert!(log.messages(Severity::Info)[0].starts_with("No action specified"));
    }

    #[tokio::test]
    async fn failure_is_logged_as_error() {
        let (d, _task, log) = setup(TaskResult::failed(3, "ipset exploded"));
        let res = d.dispatch(&ctx("vpn", Action::Start)).await.unwrap();

        assert_eq!(res.retcode(), 3);
        assert_eq!(
            log.messages(Severity::Err),
            vec!["Failed to execute task 'vpn-access': ipset exploded"]
        );
    }

    #[tokio::test]
    async fn unknown_task_is_rejected_before_any_call() {
        let (d, task, log) = setup(TaskResult::ok());
        let err = d.dispatch(&ctx("ssh", Action::Start)).await.unwrap_err();

        assert!(matches!(err, CoreError::UnknownTask(name) if name == "ssh"));
        assert!(task.calls().is_empty());
        assert!(log.events().is_empty());
    }

    #[tokio::test]
    async fn task_name_lookup_ignores_case() {
        let (d, task, _log) = setup(TaskResult::ok());
        d.dispatch(&ctx("VPN", Action::Stop)).await.unwrap();
        assert_eq!(task.calls().len(), 1);
    }
}
