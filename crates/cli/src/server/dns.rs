use ferrous_forward_application::services::{
    CoordinatorSettings, ForwardingCoordinator, ForwardingStats,
};
use ferrous_forward_application::use_cases::ForwardQueriesUseCase;
use ferrous_forward_domain::Config;
use ferrous_forward_infrastructure::dns::{resolve_upstream, UdpChannel};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

const UPSTREAM_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn start_dns_server(config: &Config) -> anyhow::Result<ForwardingStats> {
    let upstream_addr = config
        .upstream
        .resolver_addr()
        .ok_or_else(|| anyhow::anyhow!("no upstream resolver configured"))??;
    let resolver = resolve_upstream(&upstream_addr, UPSTREAM_LOOKUP_TIMEOUT).await?;

    let bind_addr: SocketAddr = config.server.listen_addr().parse()?;
    let clients = Arc::new(UdpChannel::bind(bind_addr)?);
    let upstream = Arc::new(UdpChannel::bind_for(resolver)?);

    let settings = CoordinatorSettings::from(&config.forwarding);
    info!(
        bind_address = %bind_addr,
        resolver = %resolver,
        timeout_ms = settings.query_timeout.as_millis() as u64,
        max_pending = settings.max_pending,
        passthrough_single = settings.passthrough_single,
        "DNS forwarder ready"
    );

    let use_case = ForwardQueriesUseCase::new(
        clients,
        upstream,
        resolver,
        ForwardingCoordinator::new(settings),
        config.forwarding.sweep_interval(),
    );

    Ok(use_case.execute(shutdown_signal()).await?)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
