use crate::model::description::{IceCandidateDescription, SessionDescription};
use crate::model::peer::PeerId;
use serde::{Deserialize, Serialize};

/// Messages a client sends to the signaling server. Every variant is addressed
/// to another peer; the sender is never part of the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "d", rename_all = "kebab-case")]
pub enum ClientSignal {
    CallUser {
        to: PeerId,
        offer: SessionDescription,
    },
    AcceptCall {
        to: PeerId,
        answer: SessionDescription,
    },
    RejectCall {
        to: PeerId,
    },
    IceCandidate {
        to: PeerId,
        candidate: IceCandidateDescription,
    },
}

/// Messages the signaling server pushes to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "d", rename_all = "kebab-case")]
pub enum ServerSignal {
    Welcome {
        peer_id: PeerId,
    },
    CallMade {
        from: PeerId,
        offer: SessionDescription,
    },
    CallAccepted {
        from: PeerId,
        answer: SessionDescription,
    },
    CallRejected {
        from: PeerId,
    },
    IceCandidate {
        from: PeerId,
        candidate: IceCandidateDescription,
    },
}

impl ClientSignal {
    pub fn target(&self) -> &PeerId {
        match self {
            ClientSignal::CallUser { to, .. }
            | ClientSignal::AcceptCall { to, .. }
            | ClientSignal::RejectCall { to }
            | ClientSignal::IceCandidate { to, .. } => to,
        }
    }

    pub fn op(&self) -> &'static str {
        match self {
            ClientSignal::CallUser { .. } => "call-user",
            ClientSignal::AcceptCall { .. } => "accept-call",
            ClientSignal::RejectCall { .. } => "reject-call",
            ClientSignal::IceCandidate { .. } => "ice-candidate",
        }
    }

    /// Splits the message into its recipient and the form that recipient
    /// receives, stamped with `from`. Payloads move across untouched.
    pub fn into_delivery(self, from: PeerId) -> (PeerId, ServerSignal) {
        match self {
            ClientSignal::CallUser { to, offer } => (to, ServerSignal::CallMade { from, offer }),
            ClientSignal::AcceptCall { to, answer } => {
                (to, ServerSignal::CallAccepted { from, answer })
            }
            ClientSignal::RejectCall { to } => (to, ServerSignal::CallRejected { from }),
            ClientSignal::IceCandidate { to, candidate } => {
                (to, ServerSignal::IceCandidate { from, candidate })
            }
        }
    }
}

impl ServerSignal {
    /// The relaying peer, for everything except the server's own greeting.
    pub fn sender(&self) -> Option<&PeerId> {
        match self {
            ServerSignal::Welcome { .. } => None,
            ServerSignal::CallMade { from, .. }
            | ServerSignal::CallAccepted { from, .. }
            | ServerSignal::CallRejected { from }
            | ServerSignal::IceCandidate { from, .. } => Some(from),
        }
    }

    pub fn op(&self) -> &'static str {
        match self {
            ServerSignal::Welcome { .. } => "welcome",
            ServerSignal::CallMade { .. } => "call-made",
            ServerSignal::CallAccepted { .. } => "call-accepted",
            ServerSignal::CallRejected { .. } => "call-rejected",
            ServerSignal::IceCandidate { .. } => "ice-candidate",
        }
    }
}
