//! Dependency checks reported by the health endpoint.

use async_trait::async_trait;

/// A backing service requests depend on.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// Name shown in the health report, e.g. `database`.
    fn component(&self) -> &'static str;

    /// Succeeds when the component answers. The error text is only logged.
    async fn check(&self) -> Result<(), String>;
}
