use dialtone_core::{ClientSignal, ServerSignal};

use crate::integration::init_tracing;
use crate::utils::{SILENCE_WINDOW_MS, TestPeer, sample_offer, start_test_server};

#[tokio::test]
async fn test_reject_relayed() {
    init_tracing();

    let (addr, _router) = start_test_server().await.expect("Failed to start server");

    let mut a = TestPeer::connect(addr).await.expect("A failed to connect");
    let mut b = TestPeer::connect(addr).await.expect("B failed to connect");

    a.send(ClientSignal::CallUser {
        to: b.peer_id,
        offer: sample_offer(),
    })
    .await
    .expect("Failed to send call-user");
    b.recv().await.expect("B got nothing");

    b.send(ClientSignal::RejectCall { to: a.peer_id })
        .await
        .expect("Failed to send reject-call");

    let rejected = a.recv().await.expect("A got nothing");
    assert_eq!(rejected, ServerSignal::CallRejected { from: b.peer_id });

    // The rejection only goes to its addressee.
    assert!(b.stays_silent(SILENCE_WINDOW_MS).await);
}
