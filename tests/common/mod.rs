// Shared test fakes for the three probes

#![allow(dead_code)]

use async_trait::async_trait;
use bollard::models::{ContainerSummary, PortSummary};
use opsboard::aggregator::{ProbeTimeouts, SnapshotAggregator};
use opsboard::docker_repo::normalize_container;
use opsboard::models::*;
use opsboard::probe::{ContainerRuntimeClient, MetricsProbe, ProcessSupervisorClient};
use std::sync::Arc;
use std::time::Duration;

/// Returns a fixed result after an optional delay.
pub struct Fixed<T> {
    pub result: SourceResult<T>,
    pub delay: Duration,
}

impl<T> Fixed<T> {
    pub fn new(result: SourceResult<T>) -> Self {
        Self {
            result,
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(result: SourceResult<T>, delay: Duration) -> Self {
        Self { result, delay }
    }
}

impl<T: Clone + Send + Sync> Fixed<T> {
    async fn get(&self) -> SourceResult<T> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.result.clone()
    }
}

#[async_trait]
impl MetricsProbe for Fixed<SystemMetrics> {
    async fn sample(&self) -> SourceResult<SystemMetrics> {
        self.get().await
    }
}

#[async_trait]
impl ProcessSupervisorClient for Fixed<Vec<ManagedProcess>> {
    async fn list_processes(&self) -> SourceResult<Vec<ManagedProcess>> {
        self.get().await
    }
}

#[async_trait]
impl ContainerRuntimeClient for Fixed<Vec<Container>> {
    async fn list_containers(&self) -> SourceResult<Vec<Container>> {
        self.get().await
    }
}

/// A container client whose call panics.
pub struct PanickingContainers;

#[async_trait]
impl ContainerRuntimeClient for PanickingContainers {
    async fn list_containers(&self) -> SourceResult<Vec<Container>> {
        panic!("engine client bug");
    }
}

pub fn healthy_metrics() -> SystemMetrics {
    SystemMetrics::new(120.5, 0.42, 2_000_000_000, 8_000_000_000, 0.135)
}

pub fn api_process() -> ManagedProcess {
    ManagedProcess {
        name: "api".into(),
        status: ProcessStatus::Online,
        cpu_percent: 1.2,
        memory_bytes: 50_000_000,
    }
}

/// Raw engine summary for `/db`, as Docker reports it.
pub fn db_summary() -> ContainerSummary {
    ContainerSummary {
        id: Some("c0ffee".into()),
        names: Some(vec!["/db".into()]),
        image: Some("postgres:15".into()),
        status: Some("Up 2 hours".into()),
        ports: Some(vec![PortSummary {
            ip: Some("0.0.0.0".into()),
            private_port: 5432,
            public_port: Some(5432),
            ..Default::default()
        }]),
        ..Default::default()
    }
}

/// `db_summary` after the same normalization the Docker repo applies.
pub fn db_container() -> Container {
    normalize_container(&db_summary())
}

pub fn generous_timeouts() -> ProbeTimeouts {
    ProbeTimeouts {
        metrics: Duration::from_secs(5),
        processes: Duration::from_secs(5),
        containers: Duration::from_secs(5),
    }
}

pub fn aggregator(
    metrics: impl MetricsProbe + 'static,
    processes: impl ProcessSupervisorClient + 'static,
    containers: impl ContainerRuntimeClient + 'static,
    timeouts: ProbeTimeouts,
) -> SnapshotAggregator {
    SnapshotAggregator::new(
        Arc::new(metrics),
        Arc::new(processes),
        Arc::new(containers),
        timeouts,
    )
}

pub fn healthy_aggregator() -> SnapshotAggregator {
    aggregator(
        Fixed::new(SourceResult::Ok(healthy_metrics())),
        Fixed::new(SourceResult::Ok(vec![api_process()])),
        Fixed::new(SourceResult::Ok(vec![db_container()])),
        generous_timeouts(),
    )
}
