use dialtone_client::{
    CallEvent, CallHandle, CallMachine, ClientConfig, SignalingError, WebRtcTransportFactory,
    connect_with_retry,
};
use dialtone_core::PeerId;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A registered client with its call machine already running.
///
/// `events` ends when the signaling connection is lost; `task` then finishes
/// after releasing any call in progress.
pub struct Call {
    pub peer_id: PeerId,
    pub handle: CallHandle,
    pub events: mpsc::UnboundedReceiver<CallEvent>,
    pub task: JoinHandle<()>,
}

/// Reaches the signaling server under `config.reconnect` and starts a call
/// machine on the real WebRTC transport.
pub async fn connect(config: &ClientConfig) -> Result<Call, SignalingError> {
    let conn = connect_with_retry(&config.signaling_url, &config.reconnect).await?;

    let factory = Arc::new(WebRtcTransportFactory::new(config.transport.clone()));
    let (machine, handle, events) =
        CallMachine::new(conn.peer_id, Arc::new(conn.channel), conn.inbound, factory);

    Ok(Call {
        peer_id: conn.peer_id,
        handle,
        events,
        task: tokio::spawn(machine.run()),
    })
}
