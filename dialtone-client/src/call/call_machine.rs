use crate::call::{CallCommand, CallEvent, CallHandle, CallRole, CallSession, CallState};
use crate::error::CallError;
use crate::signaling::SignalingChannel;
use crate::transport::{
    PeerConnectionState, SessionId, SignalingState, TransportEvent, TransportFactory,
};
use dialtone_core::{
    ClientSignal, IceCandidateDescription, PeerId, ServerSignal, SessionDescription,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Drives the offer/answer/candidate exchange for one client.
///
/// UI commands, inbound signals and transport events are three inputs to the
/// same machine. `run` takes them one at a time and finishes each transition,
/// including every transport call it awaits, before looking at the next.
pub struct CallMachine {
    local_peer: PeerId,
    state: CallState,
    session: Option<CallSession>,
    next_session: u64,
    factory: Arc<dyn TransportFactory>,
    signaling: Arc<dyn SignalingChannel>,
    command_rx: mpsc::Receiver<CallCommand>,
    signal_rx: mpsc::UnboundedReceiver<ServerSignal>,
    transport_rx: mpsc::Receiver<TransportEvent>,
    transport_tx: mpsc::Sender<TransportEvent>,
    events: mpsc::UnboundedSender<CallEvent>,
}

impl CallMachine {
    pub fn new(
        local_peer: PeerId,
        signaling: Arc<dyn SignalingChannel>,
        signal_rx: mpsc::UnboundedReceiver<ServerSignal>,
        factory: Arc<dyn TransportFactory>,
    ) -> (Self, CallHandle, mpsc::UnboundedReceiver<CallEvent>) {
        let (command_tx, command_rx) = mpsc::channel(32);
        let (transport_tx, transport_rx) = mpsc::channel(256);
        let (events, events_rx) = mpsc::unbounded_channel();

        let machine = Self {
            local_peer,
            state: CallState::Idle,
            session: None,
            next_session: 0,
            factory,
            signaling,
            command_rx,
            signal_rx,
            transport_rx,
            transport_tx,
            events,
        };

        (machine, CallHandle::new(command_tx), events_rx)
    }

    pub fn local_peer(&self) -> PeerId {
        self.local_peer
    }

    pub fn state(&self) -> CallState {
        self.state
    }

    pub fn session(&self) -> Option<&CallSession> {
        self.session.as_ref()
    }

    pub async fn run(mut self) {
        info!("Call machine started for {}", self.local_peer);

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(c) => {
                            let result = self.handle_command(c).await;
                            self.report(result);
                        }
                        None => {
                            info!("Command channel closed. Shutting down call machine.");
                            break;
                        }
                    }
                }

                signal = self.signal_rx.recv() => {
                    match signal {
                        Some(s) => {
                            let result = self.handle_signal(s).await;
                            self.report(result);
                        }
                        None => {
                            warn!("Signaling channel closed");
                            break;
                        }
                    }
                }

                evt = self.transport_rx.recv() => {
                    if let Some(e) = evt {
                        let result = self.handle_transport_event(e).await;
                        self.report(result);
                    }
                }
            }
        }

        self.teardown("shutdown").await;
        info!("Call machine finished");
    }

    pub async fn handle_command(&mut self, cmd: CallCommand) -> Result<(), CallError> {
        match cmd {
            CallCommand::StartCall { to } => self.start_call(to).await,
            CallCommand::Accept => self.accept().await,
            CallCommand::Reject => self.reject().await,
            CallCommand::Hangup => {
                self.teardown("hangup").await;
                Ok(())
            }
        }
    }

    pub async fn handle_signal(&mut self, signal: ServerSignal) -> Result<(), CallError> {
        match signal {
            ServerSignal::CallMade { from, offer } => self.on_offer(from, offer).await,
            ServerSignal::CallAccepted { from, answer } => self.on_accepted(from, answer).await,
            ServerSignal::CallRejected { from } => {
                self.on_rejected(from).await;
                Ok(())
            }
            ServerSignal::IceCandidate { from, candidate } => {
                self.on_remote_candidate(from, candidate).await;
                Ok(())
            }
            ServerSignal::Welcome { peer_id } => {
                debug!("Ignoring repeated welcome ({})", peer_id);
                Ok(())
            }
        }
    }

    pub async fn handle_transport_event(
        &mut self,
        event: TransportEvent,
    ) -> Result<(), CallError> {
        let Some(session) = self.session.as_mut().filter(|s| s.id == event.session()) else {
            debug!("Dropping event from closed session {}", event.session());
            return Ok(());
        };

        match event {
            TransportEvent::CandidateGenerated(_, candidate) => {
                let to = session.remote_peer;
                self.signaling
                    .send(ClientSignal::IceCandidate { to, candidate })
                    .await?;
            }

            TransportEvent::Track(_, stream) => {
                let from = session.remote_peer;
                info!("Remote stream {} from {}", stream.stream_id, from);
                session.record_remote_media(stream.clone());
                self.emit(CallEvent::RemoteTrack { from, stream });
            }

            TransportEvent::ConnectionStateChanged(_, state) => match state {
                PeerConnectionState::Connected => {
                    if self.state == CallState::Connecting {
                        self.set_state(CallState::Connected);
                        self.emit(CallEvent::Notice("Call connected!".to_owned()));
                    }
                }
                PeerConnectionState::Failed | PeerConnectionState::Closed => {
                    warn!("Peer connection {:?}, ending call", state);
                    self.teardown("connection lost").await;
                    self.emit(CallEvent::Notice("Call ended: connection lost".to_owned()));
                }
                other => debug!("Peer connection state: {:?}", other),
            },
        }
        Ok(())
    }

    async fn start_call(&mut self, to: PeerId) -> Result<(), CallError> {
        if to == self.local_peer {
            return Err(self.invalid("call yourself"));
        }

        if self.session.is_some() {
            self.supersede().await;
        }

        let mut session = self.open_session(CallRole::Caller, to).await?;

        if let Err(e) = session.attach_local_media().await {
            return Err(self.abort(session, e).await);
        }

        self.set_state(CallState::Calling);

        match self.send_offer(&session).await {
            Ok(()) => {
                self.session = Some(session);
                Ok(())
            }
            Err(e) => Err(self.abort(session, e).await),
        }
    }

    async fn send_offer(&self, session: &CallSession) -> Result<(), CallError> {
        let offer = session.transport.create_offer().await?;
        session.transport.set_local_description(offer.clone()).await?;

        info!("Calling {}", session.remote_peer);
        self.signaling
            .send(ClientSignal::CallUser {
                to: session.remote_peer,
                offer,
            })
            .await?;
        Ok(())
    }

    async fn on_offer(
        &mut self,
        from: PeerId,
        offer: SessionDescription,
    ) -> Result<(), CallError> {
        if let Some(session) = &self.session {
            // The peer we are answering dialed again, so their old offer is dead.
            let redial = session.role == CallRole::Callee && session.remote_peer == from;
            if !redial {
                info!("Busy ({}), turning down call from {}", self.state, from);
                self.signaling
                    .send(ClientSignal::RejectCall { to: from })
                    .await?;
                return Ok(());
            }
            self.teardown("replaced by a new offer").await;
        }

        let mut session = self.open_session(CallRole::Callee, from).await?;

        if let Err(e) = session.apply_remote_description(offer).await {
            error!("Error setting remote description: {}", e);
            return Err(self.abort(session, e.into()).await);
        }

        self.session = Some(session);
        self.set_state(CallState::Ringing);
        self.emit(CallEvent::IncomingCall { from });
        Ok(())
    }

    async fn accept(&mut self) -> Result<(), CallError> {
        let Some(mut session) = self.session.take() else {
            let err = self.invalid("accept a call");
            self.set_state(CallState::Idle);
            return Err(err);
        };

        let offer_pending = self.state == CallState::Ringing
            && session.transport.signaling_state().await == SignalingState::HaveRemoteOffer;
        if !offer_pending {
            let err = self.invalid("accept a call");
            session.close().await;
            self.set_state(CallState::Idle);
            return Err(err);
        }

        if let Err(e) = session.attach_local_media().await {
            return Err(self.abort(session, e).await);
        }

        match self.send_answer(&session).await {
            Ok(()) => {
                self.session = Some(session);
                self.set_state(CallState::Connecting);
                Ok(())
            }
            Err(e) => Err(self.abort(session, e).await),
        }
    }

    async fn send_answer(&self, session: &CallSession) -> Result<(), CallError> {
        let answer = session.transport.create_answer().await?;
        session.transport.set_local_description(answer.clone()).await?;

        info!("Accepting call from {}", session.remote_peer);
        self.signaling
            .send(ClientSignal::AcceptCall {
                to: session.remote_peer,
                answer,
            })
            .await?;
        Ok(())
    }

    async fn reject(&mut self) -> Result<(), CallError> {
        if self.state != CallState::Ringing {
            return Err(self.invalid("reject a call"));
        }
        let Some(session) = self.session.take() else {
            return Err(self.invalid("reject a call"));
        };

        info!("Rejecting call from {}", session.remote_peer);
        let sent = self
            .signaling
            .send(ClientSignal::RejectCall {
                to: session.remote_peer,
            })
            .await;

        session.close().await;
        self.set_state(CallState::Idle);
        sent.map_err(CallError::from)
    }

    async fn on_accepted(
        &mut self,
        from: PeerId,
        answer: SessionDescription,
    ) -> Result<(), CallError> {
        let Some(session) = self
            .session
            .as_mut()
            .filter(|s| s.role == CallRole::Caller && s.remote_peer == from)
        else {
            debug!("Ignoring call-accepted from {}: not the peer being called", from);
            return Ok(());
        };

        if let Err(e) = session.apply_remote_description(answer).await {
            error!("Error setting remote description: {}", e);
            return Err(e.into());
        }

        if self.state == CallState::Calling {
            self.set_state(CallState::Connecting);
        }
        Ok(())
    }

    async fn on_rejected(&mut self, from: PeerId) {
        let calling_them = self.state == CallState::Calling
            && self
                .session
                .as_ref()
                .is_some_and(|s| s.role == CallRole::Caller && s.remote_peer == from);
        if !calling_them {
            debug!("Ignoring call-rejected from {}", from);
            return;
        }

        self.teardown("rejected").await;
        self.emit(CallEvent::Rejected { by: from });
        self.emit(CallEvent::Notice(format!("Call rejected by: {from}")));
    }

    async fn on_remote_candidate(&mut self, from: PeerId, candidate: IceCandidateDescription) {
        let Some(session) = self.session.as_mut().filter(|s| s.remote_peer == from) else {
            debug!("Dropping ICE candidate from {}: no session with them", from);
            return;
        };
        session.add_remote_candidate(candidate).await;
    }

    async fn open_session(
        &mut self,
        role: CallRole,
        remote_peer: PeerId,
    ) -> Result<CallSession, CallError> {
        self.next_session += 1;
        let id = SessionId(self.next_session);

        let transport = self.factory.create(id, self.transport_tx.clone()).await?;
        info!("Session {} opened as {:?} with {}", id, role, remote_peer);

        Ok(CallSession::new(id, role, remote_peer, transport))
    }

    /// Clear the way for a new outgoing call. A caller left ringing is told no.
    async fn supersede(&mut self) {
        if self.state == CallState::Ringing
            && let Some(session) = &self.session
        {
            let to = session.remote_peer;
            if let Err(e) = self.signaling.send(ClientSignal::RejectCall { to }).await {
                warn!("Could not turn down {}: {}", to, e);
            }
        }
        self.teardown("superseded by a new call").await;
    }

    async fn abort(&mut self, session: CallSession, err: CallError) -> CallError {
        error!("Session {} aborted: {}", session.id, err);
        session.close().await;
        self.set_state(CallState::Idle);
        err
    }

    async fn teardown(&mut self, reason: &str) {
        if let Some(session) = self.session.take() {
            info!(
                "Tearing down session {} with {} ({})",
                session.id, session.remote_peer, reason
            );
            session.close().await;
        }
        self.set_state(CallState::Idle);
    }

    fn invalid(&self, action: &'static str) -> CallError {
        warn!("Cannot {} while {}", action, self.state);
        CallError::InvalidState {
            action,
            state: self.state,
        }
    }

    fn set_state(&mut self, to: CallState) {
        let from = self.state;
        if from == to {
            return;
        }
        info!("Call state: {} -> {}", from, to);
        self.state = to;
        self.emit(CallEvent::StateChanged { from, to });
    }

    fn report(&self, result: Result<(), CallError>) {
        if let Err(e) = result {
            self.emit(CallEvent::Error(e));
        }
    }

    fn emit(&self, event: CallEvent) {
        let _ = self.events.send(event);
    }
}
