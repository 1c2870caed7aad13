use crate::ports::{Datagram, DatagramChannel};
use crate::services::{ClientReply, Dispatch, ForwardingCoordinator, ForwardingStats};
use ferrous_forward_domain::DomainError;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Runs the forwarding event loop.
///
/// One task owns the coordinator; client datagrams, upstream datagrams, the
/// expiry tick and shutdown are multiplexed with `select!`.
pub struct ForwardQueriesUseCase {
    clients: Arc<dyn DatagramChannel>,
    upstream: Arc<dyn DatagramChannel>,
    resolver: SocketAddr,
    coordinator: ForwardingCoordinator,
    sweep_interval: Duration,
}

impl ForwardQueriesUseCase {
    pub fn new(
        clients: Arc<dyn DatagramChannel>,
        upstream: Arc<dyn DatagramChannel>,
        resolver: SocketAddr,
        coordinator: ForwardingCoordinator,
        sweep_interval: Duration,
    ) -> Self {
        Self {
            clients,
            upstream,
            resolver,
            coordinator,
            sweep_interval,
        }
    }

    /// Serves until `shutdown` resolves, then returns the final counters.
    pub async fn execute<F>(mut self, shutdown: F) -> Result<ForwardingStats, DomainError>
    where
        F: Future<Output = ()>,
    {
        let clients = Arc::clone(&self.clients);
        let upstream = Arc::clone(&self.upstream);
        let mut sweep = tokio::time::interval(self.sweep_interval);
        sweep.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        info!(
            listen = %clients.local_addr()?,
            upstream_socket = %upstream.local_addr()?,
            resolver = %self.resolver,
            "Forwarding loop started"
        );

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                received = clients.receive() => match received {
                    Ok(datagram) => self.handle_client_datagram(datagram).await,
                    Err(e) => warn!(error = %e, "Client socket receive failed"),
                },
                received = upstream.receive() => match received {
                    Ok(datagram) => self.handle_upstream_datagram(datagram).await,
                    Err(e) => warn!(error = %e, "Upstream socket receive failed"),
                },
                _ = sweep.tick() => {
                    for reply in self.coordinator.expire(Instant::now()) {
                        self.send_to_client(reply).await;
                    }
                }
            }
        }

        let stats = self.coordinator.stats();
        info!(
            accepted = stats.queries_accepted,
            forwarded = stats.subqueries_forwarded,
            completed = stats.groups_completed,
            failed = stats.groups_failed,
            timed_out = stats.groups_timed_out,
            stale = stats.stale_replies,
            local = stats.local_replies,
            in_flight = self.coordinator.in_flight(),
            "Forwarding loop stopped"
        );
        Ok(stats)
    }

    async fn handle_client_datagram(&mut self, datagram: Datagram) {
        let now = Instant::now();
        let dispatches = match self
            .coordinator
            .on_client_query(&datagram.payload, datagram.from, now)
        {
            Ok(dispatches) => dispatches,
            Err(e) => {
                debug!(
                    client = %datagram.from,
                    bytes = datagram.payload.len(),
                    error = %e,
                    "Dropping client datagram"
                );
                return;
            }
        };

        for dispatch in dispatches {
            match dispatch {
                Dispatch::Upstream {
                    generated_id,
                    payload,
                } => {
                    if let Err(e) = self.upstream.send(&payload, self.resolver).await {
                        warn!(resolver = %self.resolver, id = generated_id, error = %e, "Upstream send failed");
                        if let Some(reply) = self.coordinator.on_upstream_error(generated_id) {
                            self.send_to_client(reply).await;
                        }
                    }
                }
                Dispatch::Client(reply) => self.send_to_client(reply).await,
            }
        }
    }

    async fn handle_upstream_datagram(&mut self, datagram: Datagram) {
        if datagram.from != self.resolver {
            warn!(
                expected = %self.resolver,
                actual = %datagram.from,
                "Upstream datagram from unexpected address, dropping"
            );
            return;
        }

        match self
            .coordinator
            .on_upstream_reply(&datagram.payload, Instant::now())
        {
            Ok(Some(reply)) => self.send_to_client(reply).await,
            Ok(None) => {}
            Err(e) => {
                debug!(bytes = datagram.payload.len(), error = %e, "Dropping upstream datagram")
            }
        }
    }

    async fn send_to_client(&self, reply: ClientReply) {
        debug!(client = %reply.to, id = reply.client_id, rcode = %reply.rcode, bytes = reply.payload.len(), "Replying to client");
        if let Err(e) = self.clients.send(&reply.payload, reply.to).await {
            warn!(client = %reply.to, error = %e, "Client send failed");
        }
    }
}
