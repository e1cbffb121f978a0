use crate::call::CallState;
use thiserror::Error;

/// Local media could not be obtained. The user can usually fix this.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MediaError {
    #[error("Camera or microphone access denied. Please check your permissions.")]
    PermissionDenied,

    #[error("Camera or microphone not found. Please check your device connections.")]
    NotFound,

    #[error("Please check your camera/microphone permissions and try again ({0}).")]
    Other(String),
}

/// The media transport refused an operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("failed to set up peer connection: {0}")]
    Setup(String),

    #[error("session description rejected: {0}")]
    Description(String),

    #[error("ICE candidate rejected: {0}")]
    Candidate(String),

    #[error("failed to close peer connection: {0}")]
    Close(String),

    #[error("peer connection is already closed")]
    Closed,
}

#[derive(Debug, Error)]
pub enum SignalingError {
    #[error("signaling channel is closed")]
    ChannelClosed,

    #[error("failed to encode signal: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to reach signaling server: {0}")]
    Connect(String),

    #[error("signaling handshake failed: {0}")]
    Handshake(String),
}

/// Why a call transition failed. `Display` is the text shown to the user.
#[derive(Debug, Error)]
pub enum CallError {
    #[error("Media access error: {0}")]
    MediaUnavailable(#[from] MediaError),

    #[error("Call setup failed: {0}")]
    Negotiation(#[from] TransportError),

    #[error("Cannot {action} while {state}")]
    InvalidState {
        action: &'static str,
        state: CallState,
    },

    #[error("Signaling failed: {0}")]
    Signaling(#[from] SignalingError),
}
