// Host metrics model

use serde::{Deserialize, Serialize};

/// Point-in-time host metrics; recomputed on every snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemMetrics {
    pub uptime_seconds: f64,
    pub load_average_1m: f64,
    pub free_memory_bytes: u64,
    pub total_memory_bytes: u64,
    /// Instantaneous CPU usage in [0, 1].
    pub cpu_usage_fraction: f64,
}

impl SystemMetrics {
    /// Builds metrics with free memory clamped to total and CPU usage clamped to [0, 1].
    pub fn new(
        uptime_seconds: f64,
        load_average_1m: f64,
        free_memory_bytes: u64,
        total_memory_bytes: u64,
        cpu_usage_fraction: f64,
    ) -> Self {
        Self {
            uptime_seconds: uptime_seconds.max(0.0),
            load_average_1m: load_average_1m.max(0.0),
            free_memory_bytes: free_memory_bytes.min(total_memory_bytes),
            total_memory_bytes,
            cpu_usage_fraction: cpu_usage_fraction.clamp(0.0, 1.0),
        }
    }

    pub fn used_memory_bytes(&self) -> u64 {
        self.total_memory_bytes.saturating_sub(self.free_memory_bytes)
    }
}
