//! Run and check command handlers.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use healthwatch_config::Config;
use healthwatch_daemon::{Scheduler, SignalHandler};
use healthwatch_monitor::{
    AlertManager, Debouncer, HealthMonitor, HealthSource, HttpHealthSource, MonitorError,
    PublicStatusCache, StatusServer,
};

/// Run the monitor loop and the public status server until shutdown.
pub(crate) async fn run_daemon(
    config: Config,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting healthwatch v{}", env!("CARGO_PKG_VERSION"));

    let source: Arc<dyn HealthSource> = Arc::new(HttpHealthSource::new(&config.sources)?);

    let alerts = Arc::new(AlertManager::from_config(config.smtp.as_ref())?);
    info!(channels = ?alerts.channel_names(), "Notification channels ready");

    let debouncer = Arc::new(Debouncer::new(alerts));
    let monitor = Arc::new(HealthMonitor::from_config(
        &config.probes,
        source.clone(),
        debouncer,
    ));
    info!(probes = ?monitor.probe_names(), "Probes configured");

    let cache = Arc::new(PublicStatusCache::new(
        source,
        Duration::from_secs(config.probes.public_refresh_secs),
    ));

    let signals = SignalHandler::new();
    signals.setup_os_signals().await?;

    let server = StatusServer::new(
        host.unwrap_or(config.server.host),
        port.unwrap_or(config.server.port),
        cache,
    );
    let server_task = tokio::spawn(serve(server, signals.clone()));

    let scheduler = Scheduler::new(
        monitor,
        Duration::from_secs(config.probes.interval_secs),
        signals,
    )?;
    scheduler.run().await;

    server_task.await??;

    info!("healthwatch stopped");
    Ok(())
}

/// Serve the public status until shutdown. A server failure requests
/// shutdown so the monitor never runs without its status endpoint.
async fn serve(server: StatusServer, signals: SignalHandler) -> Result<(), MonitorError> {
    let shutdown_signals = signals.clone();
    let shutdown = async move { shutdown_signals.wait_for_shutdown().await };

    server.run(shutdown).await.inspect_err(|e| {
        error!(error = %e, addr = %server.addr(), "Status server failed, shutting down");
        signals.request_shutdown();
    })
}

/// Run one probe cycle and print every observation. Notifications only go
/// to the log.
pub(crate) async fn check_once(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let source = Arc::new(HttpHealthSource::new(&config.sources)?);
    let debouncer = Arc::new(Debouncer::new(Arc::new(AlertManager::new())));
    let monitor = HealthMonitor::from_config(&config.probes, source, debouncer);

    let report = monitor.run_cycle().await;

    for observation in &report.observations {
        println!(
            "{:<20} {:<5} {}",
            observation.key().to_string(),
            observation.value.to_string(),
            observation.message()
        );
    }
    for failure in &report.failures {
        println!("failure: {}", failure);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use healthwatch_config::SourcesConfig;
    use tokio::net::TcpListener;

    fn cache() -> Arc<PublicStatusCache> {
        let source = HttpHealthSource::new(&SourcesConfig::default()).unwrap();
        Arc::new(PublicStatusCache::new(Arc::new(source), Duration::from_secs(60)))
    }

    #[tokio::test]
    async fn test_server_failure_requests_shutdown() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = taken.local_addr().unwrap().port();
        let signals = SignalHandler::new();

        let result = serve(StatusServer::new("127.0.0.1", port, cache()), signals.clone()).await;

        assert!(result.is_err());
        assert!(signals.is_shutdown_requested());
    }

    #[tokio::test]
    async fn test_server_stops_on_shutdown() {
        let signals = SignalHandler::new();
        signals.request_shutdown();

        serve(StatusServer::new("127.0.0.1", 0, cache()), signals.clone())
            .await
            .unwrap();
        assert!(signals.is_shutdown_requested());
    }
}
