use anyhow::Result;
use opsboard::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;
    let probes = &app_config.probes;

    let sysinfo_repo = Arc::new(sysinfo_repo::SysinfoRepo::new(
        probes.effective_cpu_sample_window(),
        probes.cpu_sample_timeout(),
    ));
    let pm2 = supervisor_repo::Pm2Connector::from_config(&app_config.supervisor);
    tracing::info!(rpc_socket = %pm2.rpc_socket().display(), "PM2 supervisor target");
    let supervisor_repo = Arc::new(supervisor_repo::SupervisorRepo::new(pm2));
    let docker_repo = Arc::new(docker_repo::DockerRepo::connect());

    let aggregator = aggregator::SnapshotAggregator::new(
        sysinfo_repo,
        supervisor_repo,
        docker_repo,
        aggregator::ProbeTimeouts::from(probes),
    );

    let app = routes::app(aggregator);
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    tracing::info!("Received shutdown signal");
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    tracing::info!("Received shutdown signal");
}
