use std::fmt;

/// Where the local side of a call stands.
///
/// Caller: `Idle → Calling → Connecting → Connected`.
/// Callee: `Idle → Ringing → Connecting → Connected`.
/// Every state falls back to `Idle` on teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallState {
    Idle,
    Calling,
    Ringing,
    Connecting,
    Connected,
}

impl fmt::Display for CallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CallState::Idle => "idle",
            CallState::Calling => "calling",
            CallState::Ringing => "ringing",
            CallState::Connecting => "connecting",
            CallState::Connected => "connected",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallRole {
    Caller,
    Callee,
}
