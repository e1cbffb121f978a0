use crate::error::SignalingError;
use async_trait::async_trait;
use dialtone_core::ClientSignal;

/// Outbound half of the connection to the signaling server. Inbound traffic
/// reaches the call machine as a stream of `ServerSignal`s.
#[async_trait]
pub trait SignalingChannel: Send + Sync {
    async fn send(&self, signal: ClientSignal) -> Result<(), SignalingError>;
}
