// Per-source results and the merged snapshot

use serde::{Deserialize, Serialize};

use super::{Container, ManagedProcess, SystemMetrics};

/// Outcome of one probe. Serializes as `{"status": "ok" | "unavailable" | "error", "value": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "lowercase")]
pub enum SourceResult<T> {
    Ok(T),
    /// Backing service is not installed or not running.
    Unavailable(String),
    /// Unexpected failure, including timeouts.
    Error(String),
}

impl<T> SourceResult<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, SourceResult::Ok(_))
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, SourceResult::Unavailable(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, SourceResult::Error(_))
    }

    pub fn ok(&self) -> Option<&T> {
        match self {
            SourceResult::Ok(v) => Some(v),
            _ => None,
        }
    }

    pub fn status_str(&self) -> &'static str {
        match self {
            SourceResult::Ok(_) => "ok",
            SourceResult::Unavailable(_) => "unavailable",
            SourceResult::Error(_) => "error",
        }
    }
}

/// Merged point-in-time view of all sources for one request. Field order is fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    /// Milliseconds since the Unix epoch at dispatch time.
    pub timestamp: u64,
    pub metrics: SourceResult<SystemMetrics>,
    pub processes: SourceResult<Vec<ManagedProcess>>,
    pub containers: SourceResult<Vec<Container>>,
}
