// src/poller/client.rs

//! A small client that performs one request/reply exchange with a status server.

use crate::config::Framing;
use crate::core::StatusError;
use crate::core::protocol::request::LINE_TERMINATOR;
use bytes::BytesMut;
use serde::de::IgnoredAny;
use std::io::ErrorKind;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{Instant, timeout_at};
use tracing::debug;

/// One connection to a status server.
#[derive(Debug)]
pub struct StatusClient {
    stream: TcpStream,
    framing: Framing,
    max_response_bytes: usize,
    reply_timeout: Duration,
}

/// Used until `with_reply_timeout` overrides it.
pub const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_secs(5);

impl StatusClient {
    /// Connects to `target` (`host:port`) within `connect_timeout`. A refused
    /// connection is reported as `StatusError::ConnectionRefused`.
    pub async fn connect(
        target: &str,
        connect_timeout: Duration,
        framing: Framing,
        max_response_bytes: usize,
    ) -> Result<Self, StatusError> {
        let stream = match tokio::time::timeout(connect_timeout, TcpStream::connect(target)).await
        {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) if e.kind() == ErrorKind::ConnectionRefused => {
                return Err(StatusError::ConnectionRefused(target.to_string()));
            }
            Ok(Err(e)) => return Err(e.into()),
            Err(_) => return Err(StatusError::ConnectTimeout(target.to_string())),
        };
        Ok(Self {
            stream,
            framing,
            max_response_bytes: max_response_bytes.max(1),
            reply_timeout: DEFAULT_REPLY_TIMEOUT,
        })
    }

    /// Bounds the total wait for one reply.
    pub fn with_reply_timeout(mut self, reply_timeout: Duration) -> Self {
        self.reply_timeout = reply_timeout;
        self
    }

    /// Sends `command`, with a terminator only in newline framing.
    pub async fn send_command(&mut self, command: &str) -> Result<(), StatusError> {
        let mut buf = Vec::with_capacity(command.len() + 1);
        buf.extend_from_slice(command.as_bytes());
        if self.framing == Framing::Newline {
            buf.push(LINE_TERMINATOR);
        }
        self.stream.write_all(&buf).await?;
        self.stream.flush().await?;
        Ok(())
    }

    /// Reads one reply as text.
    ///
    /// Raw framing has no terminator, so reading stops once the bytes received
    /// form one complete JSON value, at EOF, or at `max_response_bytes`.
    /// Newline framing reads until the terminator, EOF, or the size limit.
    ///
    /// The whole wait is bounded by `reply_timeout`. When it expires, whatever
    /// arrived is the reply; if nothing did, `StatusError::ReplyTimeout`.
    pub async fn read_reply(&mut self) -> Result<String, StatusError> {
        let deadline = Instant::now() + self.reply_timeout;
        let mut buf = BytesMut::with_capacity(self.max_response_bytes);

        loop {
            if self.framing == Framing::Newline
                && let Some(pos) = buf.iter().position(|b| *b == LINE_TERMINATOR)
            {
                buf.truncate(pos);
                break;
            }
            if buf.len() >= self.max_response_bytes {
                buf.truncate(self.max_response_bytes);
                break;
            }
            let read = timeout_at(deadline, self.stream.read_buf(&mut buf)).await;
            let n = match read {
                Ok(read) => read?,
                Err(_) if buf.is_empty() => {
                    return Err(StatusError::ReplyTimeout(self.reply_timeout));
                }
                Err(_) => {
                    debug!(
                        "Reply incomplete after {:?}; using the {} byte(s) received.",
                        self.reply_timeout,
                        buf.len()
                    );
                    break;
                }
            };
            if n == 0 {
                break;
            }
            if self.framing == Framing::Raw && is_complete_json(&buf) {
                break;
            }
        }

        if buf.is_empty() {
            return Err(StatusError::ConnectionClosed);
        }
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// A full exchange: send the command and wait for the reply.
    pub async fn request(&mut self, command: &str) -> Result<String, StatusError> {
        self.send_command(command).await?;
        self.read_reply().await
    }
}

fn is_complete_json(buf: &[u8]) -> bool {
    serde_json::from_slice::<IgnoredAny>(buf).is_ok()
}
