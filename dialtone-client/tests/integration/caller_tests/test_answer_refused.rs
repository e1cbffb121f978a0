use dialtone_client::{CallCommand, CallError, CallState, SessionId};
use dialtone_core::{PeerId, SdpKind, ServerSignal};

use crate::integration::init_tracing;
use crate::utils::{AdapterCall, MockBehavior, TestCall, sample_answer};

#[tokio::test]
async fn test_answer_refused_keeps_call() {
    init_tracing();

    let mut call = TestCall::with_behavior(MockBehavior {
        fail_set_remote: true,
        ..Default::default()
    });
    let bob = PeerId::new();

    call.machine
        .handle_command(CallCommand::StartCall { to: bob })
        .await
        .expect("start_call failed");

    let err = call
        .machine
        .handle_signal(ServerSignal::CallAccepted {
            from: bob,
            answer: sample_answer(),
        })
        .await
        .expect_err("refused answer should surface");

    assert!(matches!(err, CallError::Negotiation(_)));
    assert_eq!(call.state(), CallState::Calling);

    let session = call.machine.session().expect("Session was torn down");
    assert_eq!(session.remote_peer(), bob);
    assert!(!session.has_remote_description());

    let calls = call.transport.calls_for(SessionId(1)).await;
    assert_eq!(calls.last(), Some(&AdapterCall::SetRemote(SdpKind::Answer)));
    assert!(!calls.contains(&AdapterCall::Close));
}
