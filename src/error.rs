// Probe failure taxonomy

use std::time::Duration;

use crate::models::SourceResult;

/// Why a probe could not produce a value. Converted to [`SourceResult`] at the probe boundary.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// Backing service is not installed or not running.
    #[error("{0}")]
    Unavailable(String),
    #[error("{0}")]
    Failed(String),
    #[error("{source_name} timed out after {}ms", .after.as_millis())]
    Timeout {
        source_name: &'static str,
        after: Duration,
    },
}

impl ProbeError {
    pub fn failed(e: impl std::fmt::Display) -> Self {
        ProbeError::Failed(e.to_string())
    }
}

impl<T> SourceResult<T> {
    /// Collapse a probe result into a snapshot field, logging failures under `source`.
    pub fn from_probe(source: &'static str, result: Result<T, ProbeError>) -> Self {
        match result {
            Ok(v) => SourceResult::Ok(v),
            Err(ProbeError::Unavailable(reason)) => {
                tracing::debug!(source, reason = %reason, "source unavailable");
                SourceResult::Unavailable(reason)
            }
            Err(e) => {
                tracing::warn!(source, error = %e, "source failed");
                SourceResult::Error(e.to_string())
            }
        }
    }
}
