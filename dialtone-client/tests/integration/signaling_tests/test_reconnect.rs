use std::net::SocketAddr;
use std::time::{Duration, Instant};

use dialtone_client::{ReconnectPolicy, SignalingError, connect_with_retry};
use dialtone_server::{SignalingRouter, serve_on};
use tokio::net::TcpListener;

use crate::integration::init_tracing;

/// An address nothing is listening on (yet).
async fn free_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    listener.local_addr().expect("No local address")
}

async fn start_server_after(addr: SocketAddr, delay: Duration) {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let listener = TcpListener::bind(addr).await.expect("Port was taken");
        if let Err(e) = serve_on(listener, SignalingRouter::new()).await {
            tracing::error!("[TestServer] stopped: {:?}", e);
        }
    });
}

#[tokio::test]
async fn test_late_server_is_reached() {
    init_tracing();

    let addr = free_addr().await;
    start_server_after(addr, Duration::from_millis(300)).await;

    let policy = ReconnectPolicy {
        max_attempts: 20,
        delay: Duration::from_millis(100),
    };
    let conn = connect_with_retry(&format!("http://{addr}"), &policy)
        .await
        .expect("Server never reached");
    assert!(!conn.peer_id.to_string().is_empty());
}

#[tokio::test]
async fn test_gives_up_after_max_attempts() {
    init_tracing();

    let addr = free_addr().await;
    let policy = ReconnectPolicy {
        max_attempts: 3,
        delay: Duration::from_millis(50),
    };

    let started = Instant::now();
    let result = connect_with_retry(&format!("http://{addr}"), &policy).await;

    assert!(matches!(result, Err(SignalingError::Connect(_))));
    // Two pauses sit between three attempts.
    assert!(started.elapsed() >= Duration::from_millis(100));
}

#[tokio::test]
async fn test_bad_url_is_not_retried() {
    init_tracing();

    let policy = ReconnectPolicy {
        max_attempts: 5,
        delay: Duration::from_secs(1),
    };

    let started = Instant::now();
    let result = connect_with_retry("localhost:5000", &policy).await;

    assert!(matches!(result, Err(SignalingError::Connect(_))));
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn test_each_connection_gets_new_peer_id() {
    init_tracing();

    let addr = free_addr().await;
    start_server_after(addr, Duration::ZERO).await;
    let url = format!("http://{addr}");
    let policy = ReconnectPolicy {
        max_attempts: 10,
        delay: Duration::from_millis(50),
    };

    let first = connect_with_retry(&url, &policy)
        .await
        .expect("First connection failed");
    drop(first.channel);
    let second = connect_with_retry(&url, &policy)
        .await
        .expect("Reconnect failed");

    assert_ne!(first.peer_id, second.peer_id);
}
