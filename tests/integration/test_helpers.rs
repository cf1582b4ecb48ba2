// tests/integration/test_helpers.rs

//! Test helpers and utilities for integration tests
//!
//! `TestServer` runs a real listener on `127.0.0.1:0` with a frozen clock and
//! canned telemetry, so replies are fully predictable.

#![allow(dead_code)] // Each test crate uses a different subset of these helpers.

use hoststat::config::{Config, Framing};
use hoststat::core::StatusError;
use hoststat::core::info::{
    DeviceIdentifierSource, FixedClock, InfoProducer, UptimeSource,
};
use hoststat::core::state::ServerState;
use hoststat::server;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub const TEST_MAC: &str = "02:42:ac:11:00:02";
pub const TEST_UPTIME: &str = "up 3 hours, 4 minutes";
pub const INVALID_REPLY: &str = r#"{"error":"Invalid request. Expected 'GET_DATA'."}"#;

/// A device identifier source that always succeeds.
pub struct StaticDevice(pub &'static str);

impl DeviceIdentifierSource for StaticDevice {
    fn device_id(&self) -> Result<String, StatusError> {
        Ok(self.0.to_string())
    }
}

/// A device identifier source that always fails.
pub struct FailingDevice;

impl DeviceIdentifierSource for FailingDevice {
    fn device_id(&self) -> Result<String, StatusError> {
        Err(StatusError::Internal("no such interface".into()))
    }
}

/// An uptime source that always succeeds.
pub struct StaticUptime(pub &'static str);

impl UptimeSource for StaticUptime {
    fn uptime(&self) -> Result<String, StatusError> {
        Ok(self.0.to_string())
    }
}

/// An uptime source that always fails.
pub struct FailingUptime;

impl UptimeSource for FailingUptime {
    fn uptime(&self) -> Result<String, StatusError> {
        Err(StatusError::Internal("uptime unavailable".into()))
    }
}

/// A frozen UTC clock at `hour:minute:second`.
pub fn clock_at(hour: u32, minute: u32, second: u32) -> FixedClock {
    FixedClock::at_hms(hour, minute, second).expect("valid time of day")
}

/// A producer with a frozen clock and successful canned telemetry.
pub fn producer_at(hour: u32, minute: u32, second: u32) -> InfoProducer {
    InfoProducer::new(
        clock_at(hour, minute, second),
        StaticDevice(TEST_MAC),
        StaticUptime(TEST_UPTIME),
    )
}

/// A loopback config on an ephemeral port.
pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        shutdown_grace: Duration::from_secs(2),
        ..Config::default()
    }
}

pub fn newline_config() -> Config {
    Config {
        framing: Framing::Newline,
        ..test_config()
    }
}

/// Shared state for driving a `ConnectionHandler` directly.
pub fn test_state(config: Config, producer: InfoProducer) -> Arc<ServerState> {
    Arc::new(ServerState::new(config, producer))
}

/// Initializes tracing once per test binary (ignores repeat calls).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}

/// A running server plus the handle needed to stop it.
pub struct TestServer {
    pub addr: SocketAddr,
    pub state: Arc<ServerState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Starts a raw-framing server whose clock is frozen at 12:07:30.
    pub async fn start() -> Self {
        Self::start_with(test_config(), producer_at(12, 7, 30)).await
    }

    pub async fn start_with(config: Config, producer: InfoProducer) -> Self {
        init_tracing();
        let ctx = server::bind(config, producer)
            .await
            .expect("Failed to bind test server");
        let addr = ctx.local_addr().expect("listener has an address");
        let state = ctx.state.clone();

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(ctx.serve(async move {
            let _ = shutdown_rx.await;
        }));

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
            handle,
        }
    }

    pub async fn connect(&self) -> TcpStream {
        TcpStream::connect(self.addr)
            .await
            .expect("Failed to connect to test server")
    }

    /// Triggers graceful shutdown and waits for the accept loop to return.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("server did not shut down in time")
            .expect("server task panicked");
    }
}

/// Writes `request` and reads until the bytes received form one JSON value.
pub async fn exchange(stream: &mut TcpStream, request: &[u8]) -> Value {
    stream.write_all(request).await.expect("write request");
    read_json(stream).await
}

/// Reads until the accumulated bytes parse as JSON.
pub async fn read_json(stream: &mut TcpStream) -> Value {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = tokio::time::timeout(Duration::from_secs(5), stream.read(&mut chunk))
            .await
            .expect("timed out waiting for reply")
            .expect("read reply");
        assert!(n > 0, "server closed before a full reply arrived");
        buf.extend_from_slice(&chunk[..n]);
        if let Ok(value) = serde_json::from_slice::<Value>(&buf) {
            return value;
        }
    }
}

/// Polls `condition` every 10ms for up to 2s.
pub async fn wait_for(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..200 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}

/// The seven fields every status reply carries.
pub const STATUS_FIELDS: [&str; 7] = [
    "message",
    "character_art",
    "character_message",
    "current_minute",
    "device_mac_address",
    "timestamp_utc",
    "system_uptime",
];

/// Asserts `value` is an object with exactly the status fields.
pub fn assert_status_shape(value: &Value) {
    let object = value.as_object().expect("reply is a JSON object");
    assert_eq!(object.len(), STATUS_FIELDS.len(), "unexpected fields: {value}");
    for field in STATUS_FIELDS {
        assert!(object.contains_key(field), "missing field {field}: {value}");
    }
}
