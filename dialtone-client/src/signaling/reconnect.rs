use crate::error::SignalingError;
use crate::signaling::{SignalingConnection, WsSignalingChannel, websocket_url};
use std::time::Duration;
use tracing::{info, warn};

/// How hard a client tries to (re)reach the signaling server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Connection attempts before giving up. `0` is treated as `1`.
    pub max_attempts: u32,
    /// Fixed pause between two attempts.
    pub delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_secs(1),
        }
    }
}

impl ReconnectPolicy {
    /// A single attempt, no waiting.
    pub fn once() -> Self {
        Self {
            max_attempts: 1,
            delay: Duration::ZERO,
        }
    }
}

/// Connects to the signaling server, retrying per `policy`.
///
/// Every successful connection is a fresh registration, so the returned
/// `peer_id` differs from any earlier one. A malformed URL fails at once.
pub async fn connect_with_retry(
    url: &str,
    policy: &ReconnectPolicy,
) -> Result<SignalingConnection, SignalingError> {
    websocket_url(url)?;

    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match WsSignalingChannel::connect(url).await {
            Ok(connection) => {
                if attempt > 1 {
                    info!(
                        attempt,
                        peer_id = %connection.peer_id,
                        "Reconnected to signaling server"
                    );
                }
                return Ok(connection);
            }
            Err(e) if attempt < max_attempts => {
                warn!(
                    attempt,
                    max_attempts,
                    error = %e,
                    "Signaling connection attempt failed, retrying in {:?}",
                    policy.delay
                );
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
            Err(e) => {
                warn!(attempt, error = %e, "Giving up on signaling server");
                return Err(e);
            }
        }
    }
}
