// Config loading, env overrides and validation tests

use opsboard::config::{AppConfig, DEFAULT_PORT};
use std::collections::HashMap;
use std::time::Duration;

const VALID_CONFIG: &str = r#"
[server]
port = 8081
host = "127.0.0.1"

[probes]
metrics_timeout_ms = 1500
processes_timeout_ms = 2500
containers_timeout_ms = 2000
cpu_sample_window_ms = 200
cpu_sample_timeout_ms = 800

[supervisor]
pm2_bin = "/usr/local/bin/pm2"
pm2_home = "/srv/pm2"
"#;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |k: &str| map.get(k).cloned()
}

#[test]
fn test_config_loads_from_str() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("load_from_str");
    assert_eq!(config.server.port, 8081);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.probes.metrics_timeout(), Duration::from_millis(1500));
    assert_eq!(config.probes.processes_timeout(), Duration::from_millis(2500));
    assert_eq!(config.probes.containers_timeout(), Duration::from_millis(2000));
    assert_eq!(config.probes.cpu_sample_window(), Duration::from_millis(200));
    assert_eq!(config.supervisor.pm2_bin, "/usr/local/bin/pm2");
    assert_eq!(config.supervisor.pm2_home.as_deref(), Some("/srv/pm2"));
}

#[test]
fn test_empty_config_uses_defaults() {
    let config = AppConfig::load_from_str("").expect("defaults");
    assert_eq!(config.server.port, DEFAULT_PORT);
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.supervisor.pm2_bin, "pm2");
    assert!(config.supervisor.pm2_home.is_none());
    config.validate().expect("defaults are valid");
}

#[test]
fn test_partial_section_fills_remaining_defaults() {
    let config = AppConfig::load_from_str("[server]\nport = 9000\n").unwrap();
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.probes.metrics_timeout_ms, 2000);
}

#[test]
fn test_port_env_override() {
    let mut config = AppConfig::default();
    config
        .apply_env_overrides(env(&[("PORT", "8080")]))
        .unwrap();
    assert_eq!(config.server.port, 8080);
}

#[test]
fn test_timeout_env_overrides() {
    let mut config = AppConfig::default();
    config
        .apply_env_overrides(env(&[
            ("METRICS_TIMEOUT_MS", "4000"),
            ("PROCESSES_TIMEOUT_MS", "100"),
            ("CONTAINERS_TIMEOUT_MS", "250"),
        ]))
        .unwrap();
    assert_eq!(config.probes.metrics_timeout_ms, 4000);
    assert_eq!(config.probes.processes_timeout_ms, 100);
    assert_eq!(config.probes.containers_timeout_ms, 250);
    assert_eq!(config.server.port, DEFAULT_PORT);
}

#[test]
fn test_invalid_port_env_is_rejected() {
    let mut config = AppConfig::default();
    let err = config
        .apply_env_overrides(env(&[("PORT", "http")]))
        .unwrap_err();
    assert!(err.to_string().contains("PORT"));
}

#[test]
fn test_config_validation_rejects_invalid_port() {
    let bad = VALID_CONFIG.replace("port = 8081", "port = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("server.port"));
}

#[test]
fn test_config_validation_rejects_zero_timeout() {
    let bad = VALID_CONFIG.replace("containers_timeout_ms = 2000", "containers_timeout_ms = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("containers_timeout_ms"));
}

#[test]
fn test_config_validation_rejects_cpu_window_over_ceiling() {
    let bad = VALID_CONFIG.replace("cpu_sample_window_ms = 200", "cpu_sample_window_ms = 900");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("cpu_sample_window_ms"));
}

#[test]
fn test_config_validation_uses_effective_cpu_window() {
    // A short window is raised to sysinfo's minimum; the ceiling must clear that, not the raw value
    let minimum = sysinfo::MINIMUM_CPU_UPDATE_INTERVAL.as_millis() as u64;
    let toml = format!(
        "[probes]\nmetrics_timeout_ms = {}\ncpu_sample_window_ms = 1\ncpu_sample_timeout_ms = {}\n",
        minimum + 1000,
        minimum.max(2)
    );
    let err = AppConfig::load_from_str(&toml).unwrap_err();
    assert!(err.to_string().contains("cpu_sample_window_ms"));
}

#[test]
fn test_config_validation_accepts_ceiling_above_effective_window() {
    let minimum = sysinfo::MINIMUM_CPU_UPDATE_INTERVAL.as_millis() as u64;
    let toml = format!(
        "[probes]\nmetrics_timeout_ms = {}\ncpu_sample_window_ms = 1\ncpu_sample_timeout_ms = {}\n",
        minimum + 1000,
        minimum + 100
    );
    let config = AppConfig::load_from_str(&toml).unwrap();
    assert!(config.probes.effective_cpu_sample_window() < config.probes.cpu_sample_timeout());
}

#[test]
fn test_config_validation_rejects_cpu_ceiling_over_metrics_timeout() {
    let bad = VALID_CONFIG.replace("cpu_sample_timeout_ms = 800", "cpu_sample_timeout_ms = 1500");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("cpu_sample_timeout_ms"));
}

#[test]
fn test_config_validation_rejects_empty_pm2_bin() {
    let bad = VALID_CONFIG.replace("pm2_bin = \"/usr/local/bin/pm2\"", "pm2_bin = \"\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("pm2_bin"));
}

#[test]
fn test_config_rejects_malformed_toml() {
    assert!(AppConfig::load_from_str("[server\nport = ").is_err());
}

#[test]
fn test_config_file_parses_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, VALID_CONFIG).unwrap();
    let s = std::fs::read_to_string(&path).unwrap();
    let config = AppConfig::load_from_str(&s).unwrap();
    assert_eq!(config.server.port, 8081);
}
