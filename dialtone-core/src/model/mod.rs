mod description;
mod peer;
mod signaling;

pub use description::{IceCandidateDescription, SdpKind, SessionDescription};
pub use peer::PeerId;
pub use signaling::{ClientSignal, ServerSignal};
