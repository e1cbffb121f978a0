use dialtone_client::{CallCommand, CallState, SessionId};
use dialtone_core::{PeerId, SdpKind, ServerSignal};

use crate::integration::init_tracing;
use crate::utils::{
    AdapterCall, MockBehavior, TestCall, sample_answer, sample_candidate, sample_candidate_line,
};

#[tokio::test]
async fn test_candidates_queued_until_description() {
    init_tracing();

    let mut call = TestCall::new();
    let bob = PeerId::new();

    call.machine
        .handle_command(CallCommand::StartCall { to: bob })
        .await
        .expect("start_call failed");

    for n in 1..=3 {
        call.machine
            .handle_signal(ServerSignal::IceCandidate {
                from: bob,
                candidate: sample_candidate(n),
            })
            .await
            .expect("ice-candidate failed");
    }

    assert_eq!(call.machine.session().expect("No session").pending_candidates(), 3);
    assert!(call.transport.candidates_applied(SessionId(1)).await.is_empty());

    call.machine
        .handle_signal(ServerSignal::CallAccepted {
            from: bob,
            answer: sample_answer(),
        })
        .await
        .expect("call-accepted failed");

    assert_eq!(call.machine.session().expect("No session").pending_candidates(), 0);

    // Applied after the answer, in arrival order.
    let calls = call.transport.calls_for(SessionId(1)).await;
    let answer_at = calls
        .iter()
        .position(|c| *c == AdapterCall::SetRemote(SdpKind::Answer))
        .expect("Answer not applied");
    let expected: Vec<AdapterCall> = (1..=3)
        .map(|n| AdapterCall::AddCandidate(sample_candidate_line(n)))
        .collect();
    assert_eq!(calls[answer_at + 1..], expected[..]);
}

#[tokio::test]
async fn test_candidates_applied_after_description() {
    init_tracing();

    let mut call = TestCall::new();
    let alice = PeerId::new();

    call.ring_from(alice).await;
    call.machine
        .handle_signal(ServerSignal::IceCandidate {
            from: alice,
            candidate: sample_candidate(7),
        })
        .await
        .expect("ice-candidate failed");

    assert_eq!(call.machine.session().expect("No session").pending_candidates(), 0);
    assert_eq!(
        call.transport.candidates_applied(SessionId(1)).await,
        vec![sample_candidate_line(7)]
    );
}

#[tokio::test]
async fn test_candidate_from_stranger_dropped() {
    init_tracing();

    let mut call = TestCall::new();
    call.ring_from(PeerId::new()).await;

    call.machine
        .handle_signal(ServerSignal::IceCandidate {
            from: PeerId::new(),
            candidate: sample_candidate(1),
        })
        .await
        .expect("stray candidate should be ignored");

    assert!(call.transport.candidates_applied(SessionId(1)).await.is_empty());
}

#[tokio::test]
async fn test_bad_candidate_is_skipped() {
    init_tracing();

    let mut call = TestCall::with_behavior(MockBehavior {
        reject_candidates: true,
        ..Default::default()
    });
    let alice = PeerId::new();

    call.ring_from(alice).await;
    for n in 1..=2 {
        call.machine
            .handle_signal(ServerSignal::IceCandidate {
                from: alice,
                candidate: sample_candidate(n),
            })
            .await
            .expect("a bad candidate must not fail the call");
    }

    assert_eq!(call.state(), CallState::Ringing);
    assert_eq!(call.transport.candidates_applied(SessionId(1)).await.len(), 2);
}
