use std::sync::Mutex;

use tracing::{error, info};

/// Severity-level sink used by the request pipeline.
///
/// Passed in explicitly so that resolution and dispatch never reach for a global logger.
pub trait EventLog: Send + Sync + 'static {
    fn info(&self, msg: &str);
    fn err(&self, msg: &str);
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventLog;

impl EventLog for TracingEventLog {
    fn info(&self, msg: &str) {
        info!(target: "knock.events", "{msg}");
    }

    fn err(&self, msg: &str) {
        error!(target: "knock.events", "{msg}");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Err,
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct MemoryLog {
    events: Mutex<Vec<(Severity, String)>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded events in arrival order.
    pub fn events(&self) -> Vec<(Severity, String)> {
        self.lock().clone()
    }

    pub fn messages(&self, severity: Severity) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, m)| m.clone())
            .collect()
    }

    fn push(&self, severity: Severity, msg: &str) {
        self.lock().push((severity, msg.to_string()));
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(Severity, String)>> {
        // a panic while holding the lock leaves the vector intact
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl EventLog for MemoryLog {
    fn info(&self, msg: &str) {
        self.push(Severity::Info, msg);
    }

    fn err(&self, msg: &str) {
        self.push(Severity::Err, msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_log_keeps_order_and_severity() {
        let log = MemoryLog::new();
        log.info("first");
        log.err("second");
        log.info("third");

        assert_eq!(log.events().len(), 3);
        assert_eq!(log.messages(Severity::Info), vec!["first", "third"]);
        assert_eq!(log.messages(Severity::Err), vec!["second"]);
    }
}
