//! One-to-one calls over a websocket signaling server.
//!
//! The wire model is always available. `server` adds the signaling router,
//! `client` adds the call state machine and a ready-wired [`connect`].
//!
//! ```ignore
//! use dialtone::prelude::*;
//!
//! let mut call = dialtone::connect(&ClientConfig::from_env()).await?;
//! call.handle.start_call(callee).await?;
//! while let Some(event) = call.events.recv().await { /* ... */ }
//! ```

pub use dialtone_core::{model, utils};

#[cfg(feature = "server")]
pub use dialtone_server as server;

#[cfg(feature = "client")]
pub use dialtone_client as client;

#[cfg(feature = "client")]
mod call;

#[cfg(feature = "client")]
pub use call::{Call, connect};

pub mod prelude {
    pub use dialtone_core::{
        ClientSignal, IceCandidateDescription, PeerId, SdpKind, ServerSignal, SessionDescription,
    };

    #[cfg(feature = "server")]
    pub use dialtone_server::{RouteOutcome, ServerConfig, SignalingRouter, serve, serve_on};

    #[cfg(feature = "client")]
    pub use dialtone_client::{
        CallCommand, CallError, CallEvent, CallHandle, CallMachine, CallState, ClientConfig,
        MediaConstraints, ReconnectPolicy, WebRtcTransportFactory, WsSignalingChannel,
        connect_with_retry,
    };

    #[cfg(feature = "client")]
    pub use crate::call::{Call, connect};
}
