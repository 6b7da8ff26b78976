use std::collections::HashMap;

use tracing::trace;

use crate::{error::CoreError, task::TaskRef};

/// Configured tasks indexed by their lower-cased name.
///
/// Built once at startup and shared read-only between requests.
#[derive(Default, Clone)]
pub struct TaskRegistry {
    tasks: HashMap<String, TaskRef>,
}

impl TaskRegistry {
    #[inline]
    pub fn new() -> Self {
        Self {
            tasks: HashMap::new(),
        }
    }

    /// Register a task under `name`. Names are case-insensitive.
    pub fn register(&mut self, name: &str, task: TaskRef) -> Result<(), CoreError> {
        let key = name.to_lowercase();
        if self.tasks.contains_key(&key) {
            return Err(CoreError::DuplicateTask(name.to_string()));
        }
        trace!(task = %key, id = task.id(), "task registered");
        self.tasks.insert(key, task);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TaskRef> {
        self.tasks.get(&name.to_lowercase())
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tasks.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use std::{net::IpAddr, sync::Arc};

    use async_trait::async_trait;
    use knock_model::TaskResult;

    use super::*;
    use crate::Task;

    struct Noop(&'static str);

    #[async_trait]
    impl Task for Noop {
        fn id(&self) -> &str {
            self.0
        }
        async fn start(&self, _ip: IpAddr, _ttl: u16) -> TaskResult {
            TaskResult::ok()
        }
        async fn stop(&self, _ip: IpAddr) -> TaskResult {
            TaskResult::ok()
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let mut reg = TaskRegistry::new();
        reg.register("VPN", Arc::new(Noop("vpn"))).unwrap();

        assert!(reg.contains("vpn"));
        assert!(reg.contains("Vpn"));
        assert_eq!(reg.get("vpn").map(|t| t.id()), Some("vpn"));
        assert_eq!(reg.names(), vec!["vpn"]);
    }

    #[test]
    fn missing_task_is_none() {
        let reg = TaskRegistry::new();
        assert!(reg.get("ssh").is_none());
        assert!(reg.is_empty());
    }

    #[test]
    fn duplicate_registration_fails() {
        let mut reg = TaskRegistry::new();
        reg.register("ssh", Arc::new(Noop("a"))).unwrap();

        let err = reg.register("SSH", Arc::new(Noop("b"))).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateTask(name) if name == "SSH"));
        assert_eq!(reg.len(), 1);
    }
}
