use dialtone_core::PeerId;

/// Requests coming from the user interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallCommand {
    /// Dial `to`, replacing whatever call is in progress.
    StartCall { to: PeerId },

    /// Answer the call that is currently ringing.
    Accept,

    /// Decline the call that is currently ringing.
    Reject,

    /// Drop the current call locally. Nothing is sent to the other side.
    Hangup,
}
