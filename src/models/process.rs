// Process supervisor models

use serde::{Deserialize, Serialize};

/// Lifecycle status reported by the process supervisor; serializes to snake_case JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStatus {
    Online,
    Launching,
    Stopping,
    Stopped,
    Errored,
    #[serde(rename = "one-launch-status")]
    OneLaunchStatus,
    #[serde(other)]
    Unknown,
}

impl ProcessStatus {
    /// Parse from a PM2 status string (e.g. "online", "errored").
    pub fn from_pm2(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "online" => ProcessStatus::Online,
            "launching" => ProcessStatus::Launching,
            "stopping" => ProcessStatus::Stopping,
            "stopped" => ProcessStatus::Stopped,
            "errored" => ProcessStatus::Errored,
            "one-launch-status" => ProcessStatus::OneLaunchStatus,
            _ => ProcessStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessStatus::Online => "online",
            ProcessStatus::Launching => "launching",
            ProcessStatus::Stopping => "stopping",
            ProcessStatus::Stopped => "stopped",
            ProcessStatus::Errored => "errored",
            ProcessStatus::OneLaunchStatus => "one-launch-status",
            ProcessStatus::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedProcess {
    pub name: String,
    pub status: ProcessStatus,
    pub cpu_percent: f64,
    pub memory_bytes: u64,
}
