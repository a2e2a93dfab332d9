// Probe contracts: one per external subsystem. Implementations never fail past this boundary.

use async_trait::async_trait;

use crate::models::{Container, ManagedProcess, SourceResult, SystemMetrics};

#[async_trait]
pub trait MetricsProbe: Send + Sync {
    async fn sample(&self) -> SourceResult<SystemMetrics>;
}

#[async_trait]
pub trait ProcessSupervisorClient: Send + Sync {
    async fn list_processes(&self) -> SourceResult<Vec<ManagedProcess>>;
}

#[async_trait]
pub trait ContainerRuntimeClient: Send + Sync {
    /// All containers, stopped ones included, in engine-reported order.
    async fn list_containers(&self) -> SourceResult<Vec<Container>>;
}
