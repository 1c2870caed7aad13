use ferrous_forward_domain::{DomainError, UpstreamAddr};
use std::net::SocketAddr;
use std::time::Duration;
use tracing::info;

/// Resolves a hostname to all its IP addresses (IPv4 + IPv6).
pub async fn resolve_all(
    hostname: &str,
    port: u16,
    timeout: Duration,
) -> Result<Vec<SocketAddr>, DomainError> {
    let target = format!("{}:{}", hostname, port);

    let addrs_iter = tokio::time::timeout(timeout, tokio::net::lookup_host(&target))
        .await
        .map_err(|_| DomainError::InvalidUpstream(format!("timed out resolving {}", target)))?
        .map_err(|e| {
            DomainError::InvalidUpstream(format!("resolution failed for {}: {}", target, e))
        })?;

    let addrs: Vec<SocketAddr> = addrs_iter.collect();

    if addrs.is_empty() {
        return Err(DomainError::InvalidUpstream(format!(
            "no addresses found for {}",
            target
        )));
    }

    Ok(addrs)
}

/// Pins the upstream resolver to one socket address.
///
/// Hostnames are resolved once; IPv4 results are preferred.
pub async fn resolve_upstream(
    upstream: &UpstreamAddr,
    timeout: Duration,
) -> Result<SocketAddr, DomainError> {
    let Some((hostname, port)) = upstream.unresolved_parts() else {
        return upstream
            .socket_addr()
            .ok_or_else(|| DomainError::InvalidUpstream(upstream.to_string()));
    };

    let addrs = resolve_all(hostname, port, timeout).await?;
    let chosen = addrs
        .iter()
        .copied()
        .find(SocketAddr::is_ipv4)
        .unwrap_or(addrs[0]);

    info!(upstream = %upstream, resolved = %chosen, candidates = addrs.len(), "Upstream resolved");
    Ok(chosen)
}
