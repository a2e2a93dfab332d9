// Host metrics via sysinfo

mod linux;

use crate::error::ProbeError;
use crate::models::{SourceResult, SystemMetrics};
use crate::probe::MetricsProbe;
use async_trait::async_trait;
use std::time::Duration;
use sysinfo::{MINIMUM_CPU_UPDATE_INTERVAL, System};
use tracing::instrument;

/// Stateless metrics probe: every sample builds its own `System`, so concurrent requests
/// never share refresh state.
pub struct SysinfoRepo {
    cpu_window: Duration,
    cpu_timeout: Duration,
}

impl SysinfoRepo {
    /// `cpu_window` is raised to sysinfo's minimum refresh interval when shorter.
    pub fn new(cpu_window: Duration, cpu_timeout: Duration) -> Self {
        Self {
            cpu_window: cpu_window.max(MINIMUM_CPU_UPDATE_INTERVAL),
            cpu_timeout,
        }
    }

    pub fn cpu_window(&self) -> Duration {
        self.cpu_window
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "sample"))]
    pub async fn get_system_metrics(&self) -> Result<SystemMetrics, ProbeError> {
        let (uptime, load, free, total) = tokio::task::spawn_blocking(|| {
            let mut sys = System::new();
            sys.refresh_memory();
            let uptime =
                linux::read_uptime_linux().unwrap_or_else(|| System::uptime() as f64);
            (
                uptime,
                System::load_average().one,
                sys.available_memory(),
                sys.total_memory(),
            )
        })
        .await
        .map_err(|e| ProbeError::Failed(format!("sysinfo task join: {}", e)))?;

        let cpu = match tokio::time::timeout(self.cpu_timeout, self.measure_cpu()).await {
            Ok(r) => r?,
            Err(_) => return Err(ProbeError::Failed("cpu sample timeout".into())),
        };

        Ok(SystemMetrics::new(uptime, load, free, total, cpu))
    }

    /// Two CPU readings `cpu_window` apart; the wait between them is the only suspension.
    async fn measure_cpu(&self) -> Result<f64, ProbeError> {
        let mut sys = tokio::task::spawn_blocking(|| {
            let mut sys = System::new();
            sys.refresh_cpu_usage();
            sys
        })
        .await
        .map_err(|e| ProbeError::Failed(format!("sysinfo task join: {}", e)))?;

        tokio::time::sleep(self.cpu_window).await;

        tokio::task::spawn_blocking(move || {
            sys.refresh_cpu_usage();
            sys.global_cpu_usage() as f64 / 100.0
        })
        .await
        .map_err(|e| ProbeError::Failed(format!("sysinfo task join: {}", e)))
    }
}

#[async_trait]
impl MetricsProbe for SysinfoRepo {
    async fn sample(&self) -> SourceResult<SystemMetrics> {
        SourceResult::from_probe("metrics", self.get_system_metrics().await)
    }
}
