mod media;
mod transport_adapter;
mod transport_config;
mod transport_event;
mod webrtc_transport;

pub use media::*;
pub use transport_adapter::*;
pub use transport_config::*;
pub use transport_event::*;
pub use webrtc_transport::*;
