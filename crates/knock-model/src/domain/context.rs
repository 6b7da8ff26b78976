use std::net::IpAddr;

use crate::{Action, TaskName, Ttl};

/// Everything resolved from one request before a task operation is invoked.
///
/// Lives for the duration of a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub task: TaskName,
    pub action: Action,
    pub ip: IpAddr,
    pub ttl: Ttl,
}
