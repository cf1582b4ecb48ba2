// src/core/protocol/request.rs

//! Implements the request unit and the `Encoder`/`Decoder` pair used on the
//! server side of a connection.

use super::reply::Reply;
use crate::config::Framing;
use crate::core::StatusError;
use bytes::{BufMut, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

/// The byte that terminates a request (and a reply) in newline framing.
pub const LINE_TERMINATOR: u8 = b'\n';

/// One request as delivered by the codec. Its content is untrusted bytes; it
/// only becomes text when it is classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request(Bytes);

impl Request {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns true if the request, decoded as UTF-8 and trimmed, equals
    /// `command` exactly. Non-UTF-8 input never matches.
    pub fn matches(&self, command: &str) -> bool {
        std::str::from_utf8(&self.0)
            .map(|text| text.trim() == command)
            .unwrap_or(false)
    }

    /// A printable rendering for logs.
    pub fn display_lossy(&self) -> String {
        String::from_utf8_lossy(&self.0).trim().to_string()
    }
}

/// A `tokio_util::codec` implementation that cuts requests out of the read
/// buffer and writes JSON replies.
#[derive(Debug, Clone)]
pub struct RequestCodec {
    framing: Framing,
    max_request_bytes: usize,
}

impl RequestCodec {
    pub fn new(framing: Framing, max_request_bytes: usize) -> Self {
        Self {
            framing,
            max_request_bytes: max_request_bytes.max(1),
        }
    }

    /// Finds a complete line within the first `max_request_bytes + 1` bytes.
    fn decode_line(&self, src: &mut BytesMut) -> Option<Request> {
        let window = src.len().min(self.max_request_bytes + 1);
        if let Some(pos) = src[..window].iter().position(|b| *b == LINE_TERMINATOR) {
            let mut line = src.split_to(pos + 1);
            line.truncate(pos);
            return Some(Request::new(line.freeze()));
        }

        // No terminator within bounds: an over-long line is cut at the limit.
        if src.len() > self.max_request_bytes {
            return Some(Request::new(src.split_to(self.max_request_bytes).freeze()));
        }
        None
    }
}

impl Decoder for RequestCodec {
    type Item = Request;
    type Error = StatusError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.is_empty() {
            return Ok(None);
        }

        match self.framing {
            // Whatever one read delivered is one request, bounded by the limit.
            Framing::Raw => {
                let len = src.len().min(self.max_request_bytes);
                Ok(Some(Request::new(src.split_to(len).freeze())))
            }
            Framing::Newline => Ok(self.decode_line(src)),
        }
    }

    /// An unterminated remainder at EOF is still a request and is answered.
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(src)? {
            Some(request) => Ok(Some(request)),
            None if src.is_empty() => Ok(None),
            None => Ok(Some(Request::new(src.split().freeze()))),
        }
    }
}

impl Encoder<Reply> for RequestCodec {
    type Error = StatusError;

    /// Serializes the reply as a single JSON object, followed by a terminator
    /// in newline framing.
    fn encode(&mut self, item: Reply, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let body = serde_json::to_vec(&item)?;
        dst.reserve(body.len() + 1);
        dst.put_slice(&body);
        if self.framing == Framing::Newline {
            dst.put_u8(LINE_TERMINATOR);
        }
        Ok(())
    }
}
