#![allow(dead_code)]
use async_trait::async_trait;
use ferrous_forward_application::ports::{Datagram, DatagramChannel};
use ferrous_forward_domain::DomainError;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};

/// In-memory datagram channel: tests inject inbound datagrams and observe
/// what the loop sends.
pub struct MockChannel {
    addr: SocketAddr,
    inject_tx: mpsc::UnboundedSender<Datagram>,
    inbound: Mutex<mpsc::UnboundedReceiver<Datagram>>,
    sent_tx: mpsc::UnboundedSender<(Vec<u8>, SocketAddr)>,
    sent: Mutex<mpsc::UnboundedReceiver<(Vec<u8>, SocketAddr)>>,
    fail_sends: AtomicBool,
}

impl MockChannel {
    pub fn new(addr: &str) -> Self {
        let (inject_tx, inbound) = mpsc::unbounded_channel();
        let (sent_tx, sent) = mpsc::unbounded_channel();
        Self {
            addr: addr.parse().unwrap(),
            inject_tx,
            inbound: Mutex::new(inbound),
            sent_tx,
            sent: Mutex::new(sent),
            fail_sends: AtomicBool::new(false),
        }
    }

    pub fn inject(&self, payload: Vec<u8>, from: SocketAddr) {
        self.inject_tx.send(Datagram { payload, from }).unwrap();
    }

    pub fn set_fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    pub async fn next_sent(&self, wait: Duration) -> Option<(Vec<u8>, SocketAddr)> {
        let mut sent = self.sent.lock().await;
        tokio::time::timeout(wait, sent.recv()).await.ok().flatten()
    }
}

#[async_trait]
impl DatagramChannel for MockChannel {
    async fn receive(&self) -> Result<Datagram, DomainError> {
        let mut inbound = self.inbound.lock().await;
        inbound
            .recv()
            .await
            .ok_or_else(|| DomainError::IoError("channel closed".to_string()))
    }

    async fn send(&self, payload: &[u8], to: SocketAddr) -> Result<(), DomainError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(DomainError::IoError("send refused".to_string()));
        }
        self.sent_tx
            .send((payload.to_vec(), to))
            .map_err(|e| DomainError::IoError(e.to_string()))
    }

    fn local_addr(&self) -> Result<SocketAddr, DomainError> {
        Ok(self.addr)
    }
}
