use crate::router::RouteOutcome;
use dashmap::DashMap;
use dialtone_core::{ClientSignal, PeerId, ServerSignal};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

struct RouterInner {
    peers: DashMap<PeerId, mpsc::UnboundedSender<ServerSignal>>,
}

/// Relays addressed signals between connected peers. Holds nothing but the
/// identifier → channel mapping; every connection task owns a clone.
#[derive(Clone)]
pub struct SignalingRouter {
    inner: Arc<RouterInner>,
}

impl SignalingRouter {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RouterInner {
                peers: DashMap::new(),
            }),
        }
    }

    /// Registers a freshly opened channel under a new identifier and greets it
    /// with that identifier.
    pub fn connect(&self, tx: mpsc::UnboundedSender<ServerSignal>) -> PeerId {
        let peer_id = PeerId::new();

        let _ = tx.send(ServerSignal::Welcome { peer_id });
        self.inner.peers.insert(peer_id, tx);

        info!("User connected: {}", peer_id);
        peer_id
    }

    pub fn disconnect(&self, peer_id: &PeerId) {
        if self.inner.peers.remove(peer_id).is_some() {
            info!("User disconnected: {}", peer_id);
        }
    }

    /// Forwards `signal` to its addressee with `sender` stamped as `from`.
    pub fn route(&self, sender: PeerId, signal: ClientSignal) -> RouteOutcome {
        let op = signal.op();
        let (target, delivery) = signal.into_delivery(sender);

        let Some(peer) = self.inner.peers.get(&target) else {
            debug!("Dropping {} from {}: {} is not connected", op, sender, target);
            return RouteOutcome::RoutingMiss;
        };

        if peer.send(delivery).is_err() {
            debug!("Dropping {} from {}: {} is closing", op, sender, target);
            return RouteOutcome::RoutingMiss;
        }

        debug!("Relayed {} {} -> {}", op, sender, target);
        RouteOutcome::Delivered
    }

    pub fn is_connected(&self, peer_id: &PeerId) -> bool {
        self.inner.peers.contains_key(peer_id)
    }

    pub fn peer_count(&self) -> usize {
        self.inner.peers.len()
    }
}

impl Default for SignalingRouter {
    fn default() -> Self {
        Self::new()
    }
}
