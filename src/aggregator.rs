// Fan-out/fan-in over the three probes for one request

use crate::config::ProbeConfig;
use crate::error::ProbeError;
use crate::models::{SourceResult, StatusSnapshot};
use crate::probe::{ContainerRuntimeClient, MetricsProbe, ProcessSupervisorClient};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::instrument;

#[derive(Debug, Clone, Copy)]
pub struct ProbeTimeouts {
    pub metrics: Duration,
    pub processes: Duration,
    pub containers: Duration,
}

impl From<&ProbeConfig> for ProbeTimeouts {
    fn from(c: &ProbeConfig) -> Self {
        Self {
            metrics: c.metrics_timeout(),
            processes: c.processes_timeout(),
            containers: c.containers_timeout(),
        }
    }
}

/// Stateless: each `build_snapshot` is an independent aggregation with no caching.
#[derive(Clone)]
pub struct SnapshotAggregator {
    metrics: Arc<dyn MetricsProbe>,
    processes: Arc<dyn ProcessSupervisorClient>,
    containers: Arc<dyn ContainerRuntimeClient>,
    timeouts: ProbeTimeouts,
}

impl SnapshotAggregator {
    pub fn new(
        metrics: Arc<dyn MetricsProbe>,
        processes: Arc<dyn ProcessSupervisorClient>,
        containers: Arc<dyn ContainerRuntimeClient>,
        timeouts: ProbeTimeouts,
    ) -> Self {
        Self {
            metrics,
            processes,
            containers,
            timeouts,
        }
    }

    /// Runs all probes concurrently, each as its own task under its own timeout.
    /// Wall-clock cost is the slowest probe. If the caller is dropped mid-flight the
    /// tasks finish (or time out) on their own and their results are discarded.
    #[instrument(skip(self), fields(operation = "build_snapshot"))]
    pub async fn build_snapshot(&self) -> StatusSnapshot {
        let timestamp = chrono::Utc::now().timestamp_millis().max(0) as u64;

        let metrics = self.metrics.clone();
        let processes = self.processes.clone();
        let containers = self.containers.clone();

        let metrics = dispatch("metrics", self.timeouts.metrics, async move {
            metrics.sample().await
        });
        let processes = dispatch("processes", self.timeouts.processes, async move {
            processes.list_processes().await
        });
        let containers = dispatch("containers", self.timeouts.containers, async move {
            containers.list_containers().await
        });

        let (metrics, processes, containers) = tokio::join!(
            join("metrics", metrics),
            join("processes", processes),
            join("containers", containers),
        );

        tracing::debug!(
            metrics = metrics.status_str(),
            processes = processes.status_str(),
            containers = containers.status_str(),
            "snapshot built"
        );

        StatusSnapshot {
            timestamp,
            metrics,
            processes,
            containers,
        }
    }
}

fn dispatch<T, F>(source: &'static str, limit: Duration, probe: F) -> JoinHandle<SourceResult<T>>
where
    T: Send + 'static,
    F: Future<Output = SourceResult<T>> + Send + 'static,
{
    tokio::spawn(async move {
        match tokio::time::timeout(limit, probe).await {
            Ok(result) => result,
            Err(_) => SourceResult::from_probe(
                source,
                Err(ProbeError::Timeout {
                    source_name: source,
                    after: limit,
                }),
            ),
        }
    })
}

async fn join<T>(source: &'static str, handle: JoinHandle<SourceResult<T>>) -> SourceResult<T> {
    match handle.await {
        Ok(result) => result,
        Err(e) => {
            let reason = if e.is_panic() { "panicked" } else { "was cancelled" };
            tracing::error!(source, error = %e, "probe task failed");
            SourceResult::Error(format!("{} probe {}", source, reason))
        }
    }
}
