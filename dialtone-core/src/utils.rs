/// STUN server handed to peer connections when nothing else is configured.
pub const DEFAULT_STUN_ADDR: &str = "stun:stun.l.google.com:19302";

/// Where clients look for the signaling server when nothing else is configured.
pub const DEFAULT_SIGNALING_URL: &str = "http://localhost:5000";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;

/// Path the signaling server upgrades to a websocket on.
pub const SIGNALING_PATH: &str = "/ws";
