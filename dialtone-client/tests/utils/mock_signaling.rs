use async_trait::async_trait;
use dialtone_client::{SignalingChannel, SignalingError};
use dialtone_core::ClientSignal;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

/// Mock SignalingChannel that captures every outgoing signal.
#[derive(Clone, Default)]
pub struct MockSignalingChannel {
    signals: Arc<Mutex<Vec<ClientSignal>>>,
    closed: Arc<AtomicBool>,
}

impl MockSignalingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<ClientSignal> {
        self.signals.lock().await.clone()
    }

    /// Makes every later send fail with `ChannelClosed`.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl SignalingChannel for MockSignalingChannel {
    async fn send(&self, signal: ClientSignal) -> Result<(), SignalingError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(SignalingError::ChannelClosed);
        }

        tracing::debug!("[MockSignaling] {} to {}", signal.op(), signal.target());
        self.signals.lock().await.push(signal);
        Ok(())
    }
}
