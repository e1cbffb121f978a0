use crate::transport::MediaStreamHandle;
use dialtone_core::IceCandidateDescription;
use std::fmt;

/// Identifies one negotiation attempt inside a client. Events carry it so
/// that stragglers from an abandoned attempt can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerConnectionState {
    New,
    Connecting,
    Connected,
    Disconnected,
    Failed,
    Closed,
}

/// Events a transport adapter emits for the call machine.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// A local ICE candidate was gathered and should go to the remote peer.
    CandidateGenerated(SessionId, IceCandidateDescription),

    /// Remote media started arriving.
    Track(SessionId, MediaStreamHandle),

    ConnectionStateChanged(SessionId, PeerConnectionState),
}

impl TransportEvent {
    pub fn session(&self) -> SessionId {
        match self {
            TransportEvent::CandidateGenerated(id, _)
            | TransportEvent::Track(id, _)
            | TransportEvent::ConnectionStateChanged(id, _) => *id,
        }
    }
}
