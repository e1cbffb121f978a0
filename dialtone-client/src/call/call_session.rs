use crate::call::CallRole;
use crate::error::{CallError, TransportError};
use crate::transport::{MediaStreamHandle, SessionId, TransportAdapter};
use dialtone_core::{IceCandidateDescription, PeerId, SessionDescription};
use std::collections::VecDeque;
use tracing::{debug, warn};

/// One negotiation attempt with one remote peer over one transport adapter.
///
/// `remote_peer` is fixed at creation; everything the session sends goes
/// there, no matter what happens to other sessions.
pub struct CallSession {
    pub(crate) id: SessionId,
    pub(crate) role: CallRole,
    pub(crate) remote_peer: PeerId,
    pub(crate) transport: Box<dyn TransportAdapter>,
    pending_candidates: VecDeque<IceCandidateDescription>,
    remote_description_set: bool,
    local_media: Option<MediaStreamHandle>,
    remote_media: Vec<MediaStreamHandle>,
}

impl CallSession {
    pub(crate) fn new(
        id: SessionId,
        role: CallRole,
        remote_peer: PeerId,
        transport: Box<dyn TransportAdapter>,
    ) -> Self {
        Self {
            id,
            role,
            remote_peer,
            transport,
            pending_candidates: VecDeque::new(),
            remote_description_set: false,
            local_media: None,
            remote_media: Vec::new(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn role(&self) -> CallRole {
        self.role
    }

    pub fn remote_peer(&self) -> PeerId {
        self.remote_peer
    }

    pub fn pending_candidates(&self) -> usize {
        self.pending_candidates.len()
    }

    pub fn has_remote_description(&self) -> bool {
        self.remote_description_set
    }

    /// Capture local media and attach every track to the transport.
    pub(crate) async fn attach_local_media(&mut self) -> Result<(), CallError> {
        self.transport.check_media_access().await?;
        let stream = self.transport.acquire_media().await?;

        let tracks = stream.tracks.clone();
        self.local_media = Some(stream);

        for track in &tracks {
            self.transport.add_track(track).await?;
        }
        Ok(())
    }

    /// Apply the peer's description, then every candidate that arrived
    /// before it, oldest first.
    pub(crate) async fn apply_remote_description(
        &mut self,
        desc: SessionDescription,
    ) -> Result<(), TransportError> {
        self.transport.set_remote_description(desc).await?;
        self.remote_description_set = true;

        if !self.pending_candidates.is_empty() {
            debug!(
                "Session {}: flushing {} queued ICE candidates",
                self.id,
                self.pending_candidates.len()
            );
        }
        while let Some(candidate) = self.pending_candidates.pop_front() {
            self.apply_candidate(candidate).await;
        }
        Ok(())
    }

    pub(crate) async fn add_remote_candidate(&mut self, candidate: IceCandidateDescription) {
        if !self.remote_description_set {
            self.pending_candidates.push_back(candidate);
            return;
        }
        self.apply_candidate(candidate).await;
    }

    pub(crate) fn record_remote_media(&mut self, stream: MediaStreamHandle) {
        self.remote_media.push(stream);
    }

    async fn apply_candidate(&self, candidate: IceCandidateDescription) {
        let Err(e) = self.transport.add_ice_candidate(candidate).await else {
            return;
        };
        warn!("Session {}: skipping ICE candidate: {}", self.id, e);
    }

    /// Release media, close the transport and forget queued candidates.
    pub(crate) async fn close(mut self) {
        if let Some(local) = self.local_media.take() {
            self.transport.stop_media(&local).await;
        }
        for remote in self.remote_media.drain(..) {
            self.transport.stop_media(&remote).await;
        }
        self.pending_candidates.clear();

        if let Err(e) = self.transport.close().await {
            warn!("Session {}: {}", self.id, e);
        }
    }
}
