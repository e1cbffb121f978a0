use dialtone_client::{CallCommand, CallEvent, CallState, SessionId};
use dialtone_core::{ClientSignal, PeerId};

use crate::integration::init_tracing;
use crate::utils::{AdapterCall, TestCall};

#[tokio::test]
async fn test_reject_sends_reject_call() {
    init_tracing();

    let mut call = TestCall::new();
    let alice = PeerId::new();

    call.ring_from(alice).await;
    call.drain_events();

    call.machine
        .handle_command(CallCommand::Reject)
        .await
        .expect("reject failed");

    assert_eq!(call.state(), CallState::Idle);
    assert!(call.machine.session().is_none());
    assert_eq!(
        call.signaling.sent().await,
        vec![ClientSignal::RejectCall { to: alice }]
    );
    assert_eq!(
        call.transport.calls_for(SessionId(1)).await.last(),
        Some(&AdapterCall::Close)
    );

    let events = call.drain_events();
    assert!(matches!(
        events.as_slice(),
        [CallEvent::StateChanged {
            from: CallState::Ringing,
            to: CallState::Idle
        }]
    ));
}

#[tokio::test]
async fn test_reject_with_closed_signaling() {
    init_tracing();

    let mut call = TestCall::new();
    call.ring_from(PeerId::new()).await;
    call.signaling.close();

    let result = call.machine.handle_command(CallCommand::Reject).await;

    // The local side still ends the call.
    assert!(matches!(result, Err(dialtone_client::CallError::Signaling(_))));
    assert_eq!(call.state(), CallState::Idle);
    assert!(call.machine.session().is_none());
}
