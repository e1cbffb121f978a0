use dialtone_client::{CallCommand, CallEvent, CallRole, CallState, SessionId};
use dialtone_core::{ClientSignal, PeerId, SdpKind};

use crate::integration::init_tracing;
use crate::utils::{AdapterCall, TestCall};

#[tokio::test]
async fn test_redial_replaces_ringing_offer() {
    init_tracing();

    let mut call = TestCall::new();
    let alice = PeerId::new();

    call.ring_from(alice).await;
    call.drain_events();

    // Alice hung up on her side and called again.
    call.ring_from(alice).await;

    assert!(call.signaling.sent().await.is_empty());
    assert_eq!(
        call.transport.calls_for(SessionId(1)).await,
        vec![AdapterCall::SetRemote(SdpKind::Offer), AdapterCall::Close]
    );

    let session = call.machine.session().expect("No session");
    assert_eq!(session.id(), SessionId(2));
    assert_eq!(session.role(), CallRole::Callee);
    assert_eq!(session.remote_peer(), alice);
    assert_eq!(call.state(), CallState::Ringing);

    let events = call.drain_events();
    assert!(events.iter().any(|e| matches!(e, CallEvent::IncomingCall { from } if *from == alice)));

    // Accepting answers the new offer only.
    call.machine
        .handle_command(CallCommand::Accept)
        .await
        .expect("accept failed");
    assert!(
        call.transport
            .calls_for(SessionId(2))
            .await
            .contains(&AdapterCall::SetLocal(SdpKind::Answer))
    );
    assert!(matches!(
        call.signaling.sent().await.as_slice(),
        [ClientSignal::AcceptCall { to, .. }] if *to == alice
    ));
}

#[tokio::test]
async fn test_redial_replaces_answered_call() {
    init_tracing();

    let mut call = TestCall::new();
    let alice = PeerId::new();

    call.ring_from(alice).await;
    call.machine
        .handle_command(CallCommand::Accept)
        .await
        .expect("accept failed");
    assert_eq!(call.state(), CallState::Connecting);

    call.ring_from(alice).await;

    assert_eq!(call.state(), CallState::Ringing);
    assert_eq!(call.machine.session().map(|s| s.id()), Some(SessionId(2)));
    assert_eq!(
        call.transport.calls_for(SessionId(1)).await.last(),
        Some(&AdapterCall::Close)
    );
    // Only the first answer went out; no rejection for Alice.
    assert_eq!(call.signaling.sent().await.len(), 1);
}
