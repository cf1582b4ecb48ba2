// tests/integration/shutdown_test.rs

//! Graceful shutdown, admission control and bind failures.

use super::test_helpers::*;
use hoststat::config::Config;
use hoststat::server;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;

#[tokio::test]
async fn test_shutdown_closes_idle_sessions() {
    let server = TestServer::start().await;
    let mut idle = server.connect().await;
    let state = server.state.clone();
    assert!(wait_for(|| state.stats.get_active_sessions() == 1).await);

    server.shutdown().await;

    // The server side of the idle connection is closed: EOF or reset.
    let mut buf = [0u8; 16];
    let read = tokio::time::timeout(Duration::from_secs(2), idle.read(&mut buf))
        .await
        .expect("idle client should observe the close");
    assert!(matches!(read, Ok(0) | Err(_)));
    assert_eq!(state.stats.get_active_sessions(), 0);
}

#[tokio::test]
async fn test_shutdown_stops_accepting() {
    let server = TestServer::start().await;
    let addr = server.addr;
    server.shutdown().await;

    let result = tokio::net::TcpStream::connect(addr).await;
    assert!(result.is_err(), "listener should be closed after shutdown");
}

#[tokio::test]
async fn test_session_survives_until_shutdown_after_reply() {
    let server = TestServer::start().await;
    let mut stream = server.connect().await;
    let reply = exchange(&mut stream, b"GET_DATA").await;
    assert_status_shape(&reply);

    let state = server.state.clone();
    server.shutdown().await;
    assert_eq!(state.stats.get_requests_served(), 1);
    assert_eq!(state.stats.get_active_sessions(), 0);
}

#[tokio::test]
async fn test_max_clients_rejects_excess_connections() {
    let config = Config {
        max_clients: Some(1),
        ..test_config()
    };
    let server = TestServer::start_with(config, producer_at(12, 7, 30)).await;

    let mut first = server.connect().await;
    assert!(wait_for(|| server.state.stats.get_active_sessions() == 1).await);

    let mut second = server.connect().await;
    assert!(wait_for(|| server.state.stats.get_rejected_connections() == 1).await);
    let mut buf = [0u8; 16];
    let read = tokio::time::timeout(Duration::from_secs(2), second.read(&mut buf))
        .await
        .expect("rejected client should observe the close");
    assert!(matches!(read, Ok(0) | Err(_)));

    // The admitted session is unaffected.
    let reply = exchange(&mut first, b"GET_DATA").await;
    assert_status_shape(&reply);

    // Closing it frees the slot for a new client.
    drop(first);
    assert!(wait_for(|| server.state.stats.get_active_sessions() == 0).await);
    let mut third = server.connect().await;
    let reply = exchange(&mut third, b"GET_DATA").await;
    assert_status_shape(&reply);

    drop(third);
    server.shutdown().await;
}

#[tokio::test]
async fn test_bind_failure_names_address() {
    let occupied = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = occupied.local_addr().unwrap().port();
    let config = Config {
        port,
        ..test_config()
    };

    let err = server::bind(config, producer_at(0, 0, 0))
        .await
        .err()
        .expect("binding an occupied port must fail");
    let message = format!("{err:#}");
    assert!(
        message.contains(&format!("Failed to bind 127.0.0.1:{port}")),
        "unexpected error: {message}"
    );
}

#[tokio::test]
async fn test_read_timeout_closes_idle_connection() {
    let config = Config {
        read_timeout: Some(Duration::from_millis(100)),
        ..test_config()
    };
    let server = TestServer::start_with(config, producer_at(12, 7, 30)).await;
    let mut idle = server.connect().await;

    let mut buf = [0u8; 16];
    let read = tokio::time::timeout(Duration::from_secs(2), idle.read(&mut buf))
        .await
        .expect("server should close the idle connection");
    assert!(matches!(read, Ok(0) | Err(_)));
    assert!(wait_for(|| server.state.stats.get_active_sessions() == 0).await);

    server.shutdown().await;
}
