use std::{net::IpAddr, sync::Arc};

use async_trait::async_trait;
use knock_model::{TaskResult, Ttl};

/// A named, externally implemented unit with start/stop semantics.
///
/// Implementations own whatever state they mutate (firewall rules, leases, ...) and must be safe to call concurrently.
/// Operations are opaque to the caller and may block for as long as they need.
#[async_trait]
pub trait Task: Send + Sync + 'static {
    /// Identifier used in logs.
    fn id(&self) -> &str;

    /// Grant the action for `ip` during `ttl`.
    async fn start(&self, ip: IpAddr, ttl: Ttl) -> TaskResult;

    /// Revoke the action for `ip`.
    async fn stop(&self, ip: IpAddr) -> TaskResult;
}

pub type TaskRef = Arc<dyn Task>;
