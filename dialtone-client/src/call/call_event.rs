use crate::call::CallState;
use crate::error::CallError;
use crate::transport::MediaStreamHandle;
use dialtone_core::PeerId;

/// Notifications for the user interface, all on one channel.
#[derive(Debug)]
pub enum CallEvent {
    StateChanged { from: CallState, to: CallState },

    /// An offer arrived and is waiting for accept or reject.
    IncomingCall { from: PeerId },

    Rejected { by: PeerId },

    RemoteTrack {
        from: PeerId,
        stream: MediaStreamHandle,
    },

    /// Plain informational text, e.g. "Call connected!".
    Notice(String),

    Error(CallError),
}
