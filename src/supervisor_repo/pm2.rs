// PM2 connector: daemon liveness over its RPC socket, process list via `pm2 jlist`

use super::{SupervisorConnector, SupervisorSession};
use crate::config::SupervisorConfig;
use crate::error::ProbeError;
use crate::models::{ManagedProcess, ProcessStatus};
use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub struct Pm2Connector {
    bin: String,
    home: PathBuf,
}

impl Pm2Connector {
    pub fn new(bin: impl Into<String>, home: impl Into<PathBuf>) -> Self {
        Self {
            bin: bin.into(),
            home: home.into(),
        }
    }

    pub fn from_config(config: &SupervisorConfig) -> Self {
        let home = resolve_home(config.pm2_home.as_deref(), |k| std::env::var(k).ok());
        Self::new(config.pm2_bin.clone(), home)
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn rpc_socket(&self) -> PathBuf {
        self.home.join("rpc.sock")
    }
}

/// Configured home, else `$PM2_HOME`, else `$HOME/.pm2`.
pub(crate) fn resolve_home<F>(configured: Option<&str>, lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(h) = configured.filter(|h| !h.is_empty()) {
        return PathBuf::from(h);
    }
    if let Some(h) = lookup("PM2_HOME").filter(|h| !h.is_empty()) {
        return PathBuf::from(h);
    }
    lookup("HOME")
        .map(|h| PathBuf::from(h).join(".pm2"))
        .unwrap_or_else(|| PathBuf::from(".pm2"))
}

#[async_trait]
impl SupervisorConnector for Pm2Connector {
    #[cfg(unix)]
    async fn connect(&self) -> Result<Box<dyn SupervisorSession>, ProbeError> {
        let path = self.rpc_socket();
        let stream = tokio::net::UnixStream::connect(&path)
            .await
            .map_err(|e| ProbeError::Unavailable(format!("pm2 daemon at {}: {}", path.display(), e)))?;
        Ok(Box::new(Pm2Session {
            bin: self.bin.clone(),
            home: self.home.clone(),
            stream: Some(stream),
        }))
    }

    #[cfg(not(unix))]
    async fn connect(&self) -> Result<Box<dyn SupervisorSession>, ProbeError> {
        Err(ProbeError::Unavailable(
            "pm2 rpc socket requires a unix host".into(),
        ))
    }
}

/// Holds the daemon's RPC socket only as proof of liveness for the duration of the call.
/// The process list itself comes from a separate `pm2 jlist` child process, not the socket.
#[cfg(unix)]
struct Pm2Session {
    bin: String,
    home: PathBuf,
    stream: Option<tokio::net::UnixStream>,
}

#[cfg(unix)]
#[async_trait]
impl SupervisorSession for Pm2Session {
    async fn list(&mut self) -> anyhow::Result<Vec<ManagedProcess>> {
        let output = tokio::process::Command::new(&self.bin)
            .arg("jlist")
            .env("PM2_HOME", &self.home)
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("spawn {} jlist", self.bin))?;
        anyhow::ensure!(
            output.status.success(),
            "{} jlist exited with {}: {}",
            self.bin,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
        parse_jlist(&String::from_utf8_lossy(&output.stdout))
    }

    async fn disconnect(&mut self) {
        use tokio::io::AsyncWriteExt;
        if let Some(mut stream) = self.stream.take()
            && let Err(e) = stream.shutdown().await
        {
            tracing::debug!(error = %e, "pm2 rpc socket shutdown failed");
        }
    }
}

#[derive(Deserialize)]
struct Pm2Entry {
    name: String,
    #[serde(default)]
    pm2_env: Option<Pm2Env>,
    #[serde(default)]
    monit: Option<Pm2Monit>,
}

#[derive(Deserialize)]
struct Pm2Env {
    #[serde(default)]
    status: Option<String>,
}

#[derive(Deserialize, Default)]
struct Pm2Monit {
    #[serde(default)]
    cpu: f64,
    #[serde(default)]
    memory: u64,
}

/// Parse `pm2 jlist` output. PM2 may print banner or `[PM2] ...` log lines before the JSON array.
pub fn parse_jlist(raw: &str) -> anyhow::Result<Vec<ManagedProcess>> {
    let start = json_array_start(raw).context("pm2 jlist output has no JSON array")?;
    let entries: Vec<Pm2Entry> =
        serde_json::from_str(raw[start..].trim_end()).context("decode pm2 jlist")?;
    Ok(entries
        .into_iter()
        .map(|e| {
            let status = e
                .pm2_env
                .and_then(|env| env.status)
                .map(|s| ProcessStatus::from_pm2(&s))
                .unwrap_or(ProcessStatus::Unknown);
            let monit = e.monit.unwrap_or_default();
            ManagedProcess {
                name: e.name,
                status,
                cpu_percent: monit.cpu.max(0.0),
                memory_bytes: monit.memory,
            }
        })
        .collect())
}

/// Byte offset of the first line that opens a JSON array (`[{...` or `[]`).
fn json_array_start(raw: &str) -> Option<usize> {
    let mut offset = 0;
    for line in raw.split_inclusive('\n') {
        let t = line.trim();
        if t.starts_with("[{") || t == "[]" || t == "[" {
            return Some(offset + (line.len() - line.trim_start().len()));
        }
        offset += line.len();
    }
    None
}
