use crate::error::{MediaError, TransportError};
use crate::transport::{MediaStreamHandle, MediaTrack, SessionId, TransportEvent};
use async_trait::async_trait;
use dialtone_core::{IceCandidateDescription, SessionDescription};
use tokio::sync::mpsc;

/// Offer/answer progress of a peer connection, as the transport sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalingState {
    Stable,
    HaveLocalOffer,
    HaveRemoteOffer,
    HaveLocalPranswer,
    HaveRemotePranswer,
    Closed,
}

/// The media transport a call session drives. Implementations report their
/// asynchronous happenings through the `TransportEvent` sender they were
/// created with.
#[async_trait]
pub trait TransportAdapter: Send + Sync {
    /// Fails if local capture is impossible (no permission, no device).
    async fn check_media_access(&self) -> Result<(), MediaError>;

    async fn acquire_media(&self) -> Result<MediaStreamHandle, MediaError>;

    /// Attach one of the tracks returned by `acquire_media`.
    async fn add_track(&self, track: &MediaTrack) -> Result<(), TransportError>;

    async fn create_offer(&self) -> Result<SessionDescription, TransportError>;

    async fn create_answer(&self) -> Result<SessionDescription, TransportError>;

    async fn set_local_description(&self, desc: SessionDescription) -> Result<(), TransportError>;

    async fn set_remote_description(&self, desc: SessionDescription)
    -> Result<(), TransportError>;

    async fn add_ice_candidate(&self, candidate: IceCandidateDescription)
    -> Result<(), TransportError>;

    async fn signaling_state(&self) -> SignalingState;

    /// Stop the tracks of a local or remote stream.
    async fn stop_media(&self, stream: &MediaStreamHandle);

    async fn close(&self) -> Result<(), TransportError>;
}

/// Creates one fresh adapter per call session.
#[async_trait]
pub trait TransportFactory: Send + Sync {
    async fn create(
        &self,
        session: SessionId,
        events: mpsc::Sender<TransportEvent>,
    ) -> Result<Box<dyn TransportAdapter>, TransportError>;
}
