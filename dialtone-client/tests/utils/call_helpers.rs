use std::sync::Arc;
use std::time::Duration;

use dialtone_client::{CallEvent, CallHandle, CallMachine, CallState};
use dialtone_core::{IceCandidateDescription, PeerId, ServerSignal, SessionDescription};
use tokio::sync::mpsc;

use crate::utils::{MockBehavior, MockSignalingChannel, MockTransportFactory};

/// Timeout for a single expected call event (ms).
pub const EVENT_TIMEOUT_MS: u64 = 5000;

/// A call machine wired to mocks, driven by calling its handlers directly.
pub struct TestCall {
    pub machine: CallMachine,
    pub handle: CallHandle,
    pub events: mpsc::UnboundedReceiver<CallEvent>,
    pub signals: mpsc::UnboundedSender<ServerSignal>,
    pub transport: MockTransportFactory,
    pub signaling: MockSignalingChannel,
}

impl TestCall {
    pub fn new() -> Self {
        Self::with_behavior(MockBehavior::default())
    }

    pub fn with_behavior(behavior: MockBehavior) -> Self {
        let transport = MockTransportFactory::with_behavior(behavior);
        let signaling = MockSignalingChannel::new();
        let (signals, signal_rx) = mpsc::unbounded_channel();

        let (machine, handle, events) = CallMachine::new(
            PeerId::new(),
            Arc::new(signaling.clone()),
            signal_rx,
            Arc::new(transport.clone()),
        );

        Self {
            machine,
            handle,
            events,
            signals,
            transport,
            signaling,
        }
    }

    pub fn state(&self) -> CallState {
        self.machine.state()
    }

    /// Everything emitted so far, without waiting.
    pub fn drain_events(&mut self) -> Vec<CallEvent> {
        let mut out = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            out.push(event);
        }
        out
    }

    /// Puts the machine into `Ringing` with an offer from `from`.
    pub async fn ring_from(&mut self, from: PeerId) {
        self.machine
            .handle_signal(ServerSignal::CallMade {
                from,
                offer: sample_offer(),
            })
            .await
            .expect("Failed to take incoming offer");
    }
}

/// Waits until `pred` matches an event, returning it. Earlier events are dropped.
pub async fn wait_for_event<F>(
    events: &mut mpsc::UnboundedReceiver<CallEvent>,
    pred: F,
) -> Option<CallEvent>
where
    F: Fn(&CallEvent) -> bool,
{
    let deadline = tokio::time::Instant::now() + Duration::from_millis(EVENT_TIMEOUT_MS);

    loop {
        let event = tokio::time::timeout_at(deadline, events.recv())
            .await
            .ok()??;
        if pred(&event) {
            return Some(event);
        }
    }
}

pub fn is_state(to: CallState) -> impl Fn(&CallEvent) -> bool {
    move |e| matches!(e, CallEvent::StateChanged { to: t, .. } if *t == to)
}

pub fn sample_offer() -> SessionDescription {
    SessionDescription::offer("v=0\r\no=- 4611731400430051336 2 IN IP4 127.0.0.1\r\ns=-\r\nt=0 0\r\n")
}

pub fn sample_answer() -> SessionDescription {
    SessionDescription::answer("v=0\r\no=- 1 2 IN IP4 127.0.0.1\r\ns=-\r\nt=0 0\r\n")
}

pub fn sample_candidate(n: u32) -> IceCandidateDescription {
    IceCandidateDescription::new(format!(
        "candidate:{n} 1 udp 2130706431 192.168.1.{n} 5000{n} typ host"
    ))
    .with_sdp_mid("0")
    .with_sdp_m_line_index(0)
}

/// The candidate line of `sample_candidate(n)`, as the mock transport records it.
pub fn sample_candidate_line(n: u32) -> String {
    sample_candidate(n)
        .candidate()
        .expect("sample candidate has a line")
        .to_owned()
}
