use crate::error::{MediaError, TransportError};
use crate::transport::{
    MediaConstraints, MediaStreamHandle, MediaTrack, PeerConnectionState, SessionId,
    SignalingState, TrackKind, TransportAdapter, TransportConfig, TransportEvent,
    TransportFactory,
};
use async_trait::async_trait;
use dialtone_core::{IceCandidateDescription, SdpKind, SessionDescription};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::{MIME_TYPE_OPUS, MIME_TYPE_VP8, MediaEngine};
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::peer_connection::signaling_state::RTCSignalingState;
use webrtc::rtp_transceiver::RTCRtpTransceiver;
use webrtc::rtp_transceiver::rtp_codec::{RTCRtpCodecCapability, RTPCodecType};
use webrtc::rtp_transceiver::rtp_receiver::RTCRtpReceiver;
use webrtc::rtp_transceiver::rtp_sender::RTCRtpSender;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;
use webrtc::track::track_remote::TrackRemote;

/// Builds a `WebRtcTransport` for every call session.
#[derive(Clone, Default)]
pub struct WebRtcTransportFactory {
    config: TransportConfig,
}

impl WebRtcTransportFactory {
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl TransportFactory for WebRtcTransportFactory {
    async fn create(
        &self,
        session: SessionId,
        events: mpsc::Sender<TransportEvent>,
    ) -> Result<Box<dyn TransportAdapter>, TransportError> {
        let transport = WebRtcTransport::new(session, self.config.clone(), events).await?;
        Ok(Box::new(transport))
    }
}

#[derive(Default)]
struct LocalMedia {
    stream_id: Option<String>,
    tracks: HashMap<String, Arc<TrackLocalStaticSample>>,
    senders: Vec<Arc<RTCRtpSender>>,
}

/// Transport adapter on top of a `webrtc` peer connection.
pub struct WebRtcTransport {
    session: SessionId,
    media: MediaConstraints,
    peer_connection: Arc<RTCPeerConnection>,
    local: Mutex<LocalMedia>,
}

impl WebRtcTransport {
    /// Creates the peer connection and wires its callbacks into `event_tx`.
    pub async fn new(
        session: SessionId,
        config: TransportConfig,
        event_tx: mpsc::Sender<TransportEvent>,
    ) -> Result<Self, TransportError> {
        let mut m = MediaEngine::default();
        m.register_default_codecs().map_err(setup_error)?;
        let registry =
            register_default_interceptors(Registry::new(), &mut m).map_err(setup_error)?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        let ice_servers = if config.ice_servers.is_empty() {
            vec![]
        } else {
            vec![RTCIceServer {
                urls: config.ice_servers.clone(),
                ..Default::default()
            }]
        };

        let rtc_config = RTCConfiguration {
            ice_servers,
            ..Default::default()
        };

        let peer_connection = Arc::new(
            api.new_peer_connection(rtc_config)
                .await
                .map_err(setup_error)?,
        );

        let state_tx = event_tx.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let tx = state_tx.clone();

                Box::pin(async move {
                    info!("Session {}: peer connection state {:?}", session, s);
                    let Some(state) = connection_state(s) else {
                        return;
                    };
                    let _ = tx
                        .send(TransportEvent::ConnectionStateChanged(session, state))
                        .await;
                })
            },
        ));

        let ice_tx = event_tx.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();

            Box::pin(async move {
                let Some(candidate) = c else { return };
                let Ok(init) = candidate.to_json() else {
                    return;
                };
                let candidate = from_rtc_candidate(init);
                let _ = tx
                    .send(TransportEvent::CandidateGenerated(session, candidate))
                    .await;
            })
        }));

        let track_tx = event_tx;
        peer_connection.on_track(Box::new(
            move |track: Arc<TrackRemote>,
                  _receiver: Arc<RTCRtpReceiver>,
                  _transceiver: Arc<RTCRtpTransceiver>| {
                let tx = track_tx.clone();

                Box::pin(async move {
                    let kind = match track.kind() {
                        RTPCodecType::Video => TrackKind::Video,
                        _ => TrackKind::Audio,
                    };
                    let stream = MediaStreamHandle {
                        stream_id: track.stream_id(),
                        tracks: vec![MediaTrack {
                            id: track.id(),
                            kind,
                        }],
                    };
                    debug!("Session {}: remote track {:?}", session, stream);
                    let _ = tx.send(TransportEvent::Track(session, stream)).await;
                })
            },
        ));

        Ok(Self {
            session,
            media: config.media,
            peer_connection,
            local: Mutex::new(LocalMedia::default()),
        })
    }

    fn is_closed(&self) -> bool {
        self.peer_connection.connection_state() == RTCPeerConnectionState::Closed
    }
}

#[async_trait]
impl TransportAdapter for WebRtcTransport {
    async fn check_media_access(&self) -> Result<(), MediaError> {
        if self.media.is_empty() {
            return Err(MediaError::NotFound);
        }
        if self.is_closed() {
            return Err(MediaError::Other("peer connection is closed".to_owned()));
        }
        Ok(())
    }

    async fn acquire_media(&self) -> Result<MediaStreamHandle, MediaError> {
        if self.media.is_empty() {
            return Err(MediaError::NotFound);
        }

        let stream_id = format!("dialtone-{}", self.session.0);
        let mut local = self.local.lock().await;
        let mut tracks = Vec::new();

        let wanted = [
            (self.media.audio, "audio", MIME_TYPE_OPUS, TrackKind::Audio),
            (self.media.video, "video", MIME_TYPE_VP8, TrackKind::Video),
        ];
        for (enabled, id, mime_type, kind) in wanted {
            if !enabled {
                continue;
            }
            let track = Arc::new(TrackLocalStaticSample::new(
                RTCRtpCodecCapability {
                    mime_type: mime_type.to_owned(),
                    ..Default::default()
                },
                id.to_owned(),
                stream_id.clone(),
            ));
            local.tracks.insert(id.to_owned(), track);
            tracks.push(MediaTrack {
                id: id.to_owned(),
                kind,
            });
        }

        local.stream_id = Some(stream_id.clone());
        Ok(MediaStreamHandle { stream_id, tracks })
    }

    async fn add_track(&self, track: &MediaTrack) -> Result<(), TransportError> {
        if self.is_closed() {
            return Err(TransportError::Closed);
        }

        let mut local = self.local.lock().await;
        let Some(local_track) = local.tracks.get(&track.id).cloned() else {
            return Err(TransportError::Setup(format!(
                "unknown local track {}",
                track.id
            )));
        };

        let sender = self
            .peer_connection
            .add_track(local_track as Arc<dyn TrackLocal + Send + Sync>)
            .await
            .map_err(setup_error)?;
        local.senders.push(sender);
        Ok(())
    }

    async fn create_offer(&self) -> Result<SessionDescription, TransportError> {
        let offer = self
            .peer_connection
            .create_offer(None)
            .await
            .map_err(description_error)?;
        Ok(SessionDescription::offer(offer.sdp))
    }

    async fn create_answer(&self) -> Result<SessionDescription, TransportError> {
        let answer = self
            .peer_connection
            .create_answer(None)
            .await
            .map_err(description_error)?;
        Ok(SessionDescription::answer(answer.sdp))
    }

    async fn set_local_description(&self, desc: SessionDescription) -> Result<(), TransportError> {
        self.peer_connection
            .set_local_description(to_rtc_description(desc)?)
            .await
            .map_err(description_error)
    }

    async fn set_remote_description(
        &self,
        desc: SessionDescription,
    ) -> Result<(), TransportError> {
        self.peer_connection
            .set_remote_description(to_rtc_description(desc)?)
            .await
            .map_err(description_error)
    }

    async fn add_ice_candidate(
        &self,
        candidate: IceCandidateDescription,
    ) -> Result<(), TransportError> {
        let Some(line) = candidate.candidate() else {
            return Err(TransportError::Candidate(
                "missing candidate line".to_owned(),
            ));
        };
        let init = RTCIceCandidateInit {
            candidate: line.to_owned(),
            sdp_mid: candidate.sdp_mid().map(str::to_owned),
            sdp_mline_index: candidate.sdp_m_line_index(),
            username_fragment: candidate.username_fragment().map(str::to_owned),
        };
        self.peer_connection
            .add_ice_candidate(init)
            .await
            .map_err(|e| TransportError::Candidate(e.to_string()))
    }

    async fn signaling_state(&self) -> SignalingState {
        match self.peer_connection.signaling_state() {
            RTCSignalingState::HaveLocalOffer => SignalingState::HaveLocalOffer,
            RTCSignalingState::HaveRemoteOffer => SignalingState::HaveRemoteOffer,
            RTCSignalingState::HaveLocalPranswer => SignalingState::HaveLocalPranswer,
            RTCSignalingState::HaveRemotePranswer => SignalingState::HaveRemotePranswer,
            RTCSignalingState::Closed => SignalingState::Closed,
            _ => SignalingState::Stable,
        }
    }

    async fn stop_media(&self, stream: &MediaStreamHandle) {
        let mut local = self.local.lock().await;
        if local.stream_id.as_deref() != Some(stream.stream_id.as_str()) {
            // Remote tracks end with the connection.
            debug!(
                "Session {}: releasing remote stream {}",
                self.session, stream.stream_id
            );
            return;
        }

        for sender in local.senders.drain(..) {
            if let Err(e) = self.peer_connection.remove_track(&sender).await {
                debug!("Session {}: remove_track: {}", self.session, e);
            }
        }
        local.tracks.clear();
        local.stream_id = None;
    }

    async fn close(&self) -> Result<(), TransportError> {
        self.peer_connection
            .close()
            .await
            .map_err(|e| TransportError::Close(e.to_string()))
    }
}

fn to_rtc_description(desc: SessionDescription) -> Result<RTCSessionDescription, TransportError> {
    let Some(sdp) = desc.sdp().map(str::to_owned) else {
        return Err(TransportError::Description("missing sdp".to_owned()));
    };
    let rtc = match desc.kind() {
        Some(SdpKind::Offer) => RTCSessionDescription::offer(sdp),
        Some(SdpKind::Answer) => RTCSessionDescription::answer(sdp),
        Some(SdpKind::Pranswer) => RTCSessionDescription::pranswer(sdp),
        Some(SdpKind::Rollback) => {
            return Err(TransportError::Description(
                "rollback is not supported".to_owned(),
            ));
        }
        None => {
            return Err(TransportError::Description(format!(
                "unknown description type: {}",
                desc.as_value()["type"]
            )));
        }
    };
    rtc.map_err(description_error)
}

fn from_rtc_candidate(init: RTCIceCandidateInit) -> IceCandidateDescription {
    let mut candidate = IceCandidateDescription::new(init.candidate);
    if let Some(mid) = init.sdp_mid {
        candidate = candidate.with_sdp_mid(mid);
    }
    if let Some(index) = init.sdp_mline_index {
        candidate = candidate.with_sdp_m_line_index(index);
    }
    if let Some(ufrag) = init.username_fragment {
        candidate = candidate.with_username_fragment(ufrag);
    }
    candidate
}

fn connection_state(s: RTCPeerConnectionState) -> Option<PeerConnectionState> {
    match s {
        RTCPeerConnectionState::New => Some(PeerConnectionState::New),
        RTCPeerConnectionState::Connecting => Some(PeerConnectionState::Connecting),
        RTCPeerConnectionState::Connected => Some(PeerConnectionState::Connected),
        RTCPeerConnectionState::Disconnected => Some(PeerConnectionState::Disconnected),
        RTCPeerConnectionState::Failed => Some(PeerConnectionState::Failed),
        RTCPeerConnectionState::Closed => Some(PeerConnectionState::Closed),
        _ => None,
    }
}

fn setup_error(e: webrtc::Error) -> TransportError {
    TransportError::Setup(e.to_string())
}

fn description_error(e: webrtc::Error) -> TransportError {
    TransportError::Description(e.to_string())
}
