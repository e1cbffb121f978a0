use dialtone_core::{ClientSignal, ServerSignal};

use crate::integration::init_tracing;
use crate::utils::{TestPeer, start_test_server};

#[tokio::test]
async fn test_invalid_frame_ignored() {
    init_tracing();

    let (addr, router) = start_test_server().await.expect("Failed to start server");

    let mut a = TestPeer::connect(addr).await.expect("A failed to connect");
    let mut b = TestPeer::connect(addr).await.expect("B failed to connect");

    a.send_raw(r#"{"op":"hang-up","d":{}}"#)
        .await
        .expect("Failed to send raw frame");
    a.send_raw("not json at all")
        .await
        .expect("Failed to send raw frame");

    // The connection survives and keeps relaying.
    a.send(ClientSignal::RejectCall { to: b.peer_id })
        .await
        .expect("Failed to send reject-call");

    let signal = b.recv().await.expect("B got nothing");
    assert_eq!(signal, ServerSignal::CallRejected { from: a.peer_id });
    assert!(router.is_connected(&a.peer_id));
}
