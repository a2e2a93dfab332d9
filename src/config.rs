use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub probes: ProbeConfig,
    pub supervisor: SupervisorConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            host: "0.0.0.0".into(),
        }
    }
}

/// Per-probe timeouts. Each source is bounded independently of the others.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub metrics_timeout_ms: u64,
    pub processes_timeout_ms: u64,
    pub containers_timeout_ms: u64,
    /// Gap between the two CPU readings used to compute usage.
    pub cpu_sample_window_ms: u64,
    /// Ceiling for the CPU measurement; must fire before `metrics_timeout_ms`.
    pub cpu_sample_timeout_ms: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            metrics_timeout_ms: 2000,
            processes_timeout_ms: 3000,
            containers_timeout_ms: 3000,
            cpu_sample_window_ms: 250,
            cpu_sample_timeout_ms: 1000,
        }
    }
}

impl ProbeConfig {
    pub fn metrics_timeout(&self) -> Duration {
        Duration::from_millis(self.metrics_timeout_ms)
    }

    pub fn processes_timeout(&self) -> Duration {
        Duration::from_millis(self.processes_timeout_ms)
    }

    pub fn containers_timeout(&self) -> Duration {
        Duration::from_millis(self.containers_timeout_ms)
    }

    pub fn cpu_sample_window(&self) -> Duration {
        Duration::from_millis(self.cpu_sample_window_ms)
    }

    /// The window the metrics probe actually waits: never below sysinfo's refresh minimum.
    pub fn effective_cpu_sample_window(&self) -> Duration {
        self.cpu_sample_window().max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL)
    }

    pub fn cpu_sample_timeout(&self) -> Duration {
        Duration::from_millis(self.cpu_sample_timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SupervisorConfig {
    /// PM2 executable used for `jlist`.
    pub pm2_bin: String,
    /// PM2 home directory holding `rpc.sock`. Falls back to `$PM2_HOME`, then `$HOME/.pm2`.
    pub pm2_home: Option<String>,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            pm2_bin: "pm2".into(),
            pm2_home: None,
        }
    }
}

impl AppConfig {
    /// Load from `CONFIG_FILE` (default `config.toml`), then apply environment overrides.
    /// A missing default file means built-in defaults; a missing explicit file is an error.
    pub fn load() -> anyhow::Result<Self> {
        let explicit = std::env::var("CONFIG_FILE").ok();
        let path = explicit.clone().unwrap_or_else(|| "config.toml".into());
        let mut config = match std::fs::read_to_string(&path) {
            Ok(s) => toml::from_str(&s)?,
            Err(e) if explicit.is_none() && e.kind() == std::io::ErrorKind::NotFound => {
                Self::default()
            }
            Err(e) => return Err(anyhow::anyhow!("config file {}: {}", path, e)),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `PORT` and per-probe timeout overrides from `lookup` (normally the process env).
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("PORT") {
            self.server.port = v
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("PORT must be a port number, got {:?}: {}", v, e))?;
        }
        let timeouts = [
            ("METRICS_TIMEOUT_MS", &mut self.probes.metrics_timeout_ms),
            ("PROCESSES_TIMEOUT_MS", &mut self.probes.processes_timeout_ms),
            ("CONTAINERS_TIMEOUT_MS", &mut self.probes.containers_timeout_ms),
        ];
        for (key, slot) in timeouts {
            if let Some(v) = lookup(key) {
                *slot = v
                    .trim()
                    .parse()
                    .map_err(|e| anyhow::anyhow!("{} must be milliseconds, got {:?}: {}", key, v, e))?;
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(!self.server.host.is_empty(), "server.host must be non-empty");
        let p = &self.probes;
        anyhow::ensure!(
            p.metrics_timeout_ms > 0,
            "probes.metrics_timeout_ms must be > 0, got {}",
            p.metrics_timeout_ms
        );
        anyhow::ensure!(
            p.processes_timeout_ms > 0,
            "probes.processes_timeout_ms must be > 0, got {}",
            p.processes_timeout_ms
        );
        anyhow::ensure!(
            p.containers_timeout_ms > 0,
            "probes.containers_timeout_ms must be > 0, got {}",
            p.containers_timeout_ms
        );
        anyhow::ensure!(
            p.cpu_sample_window_ms > 0,
            "probes.cpu_sample_window_ms must be > 0, got {}",
            p.cpu_sample_window_ms
        );
        let window = p.effective_cpu_sample_window();
        anyhow::ensure!(
            window < p.cpu_sample_timeout(),
            "probes.cpu_sample_window_ms ({}, effective {}ms) must be < probes.cpu_sample_timeout_ms ({})",
            p.cpu_sample_window_ms,
            window.as_millis(),
            p.cpu_sample_timeout_ms
        );
        anyhow::ensure!(
            p.cpu_sample_timeout_ms < p.metrics_timeout_ms,
            "probes.cpu_sample_timeout_ms ({}) must be < probes.metrics_timeout_ms ({})",
            p.cpu_sample_timeout_ms,
            p.metrics_timeout_ms
        );
        anyhow::ensure!(
            !self.supervisor.pm2_bin.is_empty(),
            "supervisor.pm2_bin must be non-empty"
        );
        Ok(())
    }
}
