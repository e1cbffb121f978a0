mod reconnect;
mod signaling_channel;
mod ws_signaling;

pub use reconnect::*;
pub use signaling_channel::*;
pub use ws_signaling::*;
