use crate::error::SignalingError;
use crate::signaling::SignalingChannel;
use async_trait::async_trait;
use dialtone_core::utils::SIGNALING_PATH;
use dialtone_core::{ClientSignal, PeerId, ServerSignal};
use futures::{SinkExt, Stream, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tracing::{debug, info, warn};

const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Signaling over a websocket to a dialtone server.
#[derive(Clone)]
pub struct WsSignalingChannel {
    tx: mpsc::UnboundedSender<String>,
}

/// A live signaling connection: the outbound channel, the identity the server
/// assigned, and the inbound signal stream. The stream ends when the server
/// goes away.
pub struct SignalingConnection {
    pub channel: WsSignalingChannel,
    pub peer_id: PeerId,
    pub inbound: mpsc::UnboundedReceiver<ServerSignal>,
}

impl WsSignalingChannel {
    pub async fn connect(url: &str) -> Result<SignalingConnection, SignalingError> {
        let ws_url = websocket_url(url)?;
        info!("Connecting to signaling server at {}", ws_url);

        let (ws, _) = connect_async(ws_url.as_str())
            .await
            .map_err(|e| SignalingError::Connect(e.to_string()))?;
        let (mut sink, mut stream) = ws.split();

        let peer_id = tokio::time::timeout(HANDSHAKE_TIMEOUT, wait_for_welcome(&mut stream))
            .await
            .map_err(|_| SignalingError::Handshake("timed out waiting for welcome".to_owned()))??;

        info!("Connected to signaling server as {}", peer_id);

        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();
        let (in_tx, in_rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Some(json) = out_rx.recv().await {
                if sink.send(Message::text(json)).await.is_err() {
                    break;
                }
            }
            let _ = sink.close().await;
        });

        tokio::spawn(async move {
            while let Some(Ok(msg)) = stream.next().await {
                match msg {
                    Message::Text(text) => {
                        match serde_json::from_str::<ServerSignal>(text.as_str()) {
                            Ok(signal) => {
                                if in_tx.send(signal).is_err() {
                                    break;
                                }
                            }
                            Err(e) => warn!("Invalid ServerSignal: {}", e),
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            info!("Signaling connection closed");
        });

        Ok(SignalingConnection {
            channel: WsSignalingChannel { tx: out_tx },
            peer_id,
            inbound: in_rx,
        })
    }
}

#[async_trait]
impl SignalingChannel for WsSignalingChannel {
    async fn send(&self, signal: ClientSignal) -> Result<(), SignalingError> {
        let json = serde_json::to_string(&signal)?;
        self.tx
            .send(json)
            .map_err(|_| SignalingError::ChannelClosed)
    }
}

async fn wait_for_welcome<S>(stream: &mut S) -> Result<PeerId, SignalingError>
where
    S: Stream<Item = Result<Message, WsError>> + Unpin,
{
    while let Some(frame) = stream.next().await {
        let frame = frame.map_err(|e| SignalingError::Handshake(e.to_string()))?;
        let Message::Text(text) = frame else {
            continue;
        };
        match serde_json::from_str::<ServerSignal>(text.as_str()) {
            Ok(ServerSignal::Welcome { peer_id }) => return Ok(peer_id),
            Ok(other) => debug!("Signal before welcome: {}", other.op()),
            Err(e) => warn!("Invalid ServerSignal: {}", e),
        }
    }
    Err(SignalingError::Handshake(
        "connection closed before welcome".to_owned(),
    ))
}

/// Turns a server base URL (`http://host:port`) into its websocket endpoint.
pub fn websocket_url(base: &str) -> Result<String, SignalingError> {
    let base = base.trim().trim_end_matches('/');

    let url = if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if base.starts_with("ws://") || base.starts_with("wss://") {
        base.to_owned()
    } else {
        return Err(SignalingError::Connect(format!(
            "unsupported signaling URL: {base:?}"
        )));
    };

    if url.ends_with(SIGNALING_PATH) {
        Ok(url)
    } else {
        Ok(format!("{url}{SIGNALING_PATH}"))
    }
}
