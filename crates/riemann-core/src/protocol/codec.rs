//! Codec for Riemann protocol messages.
//!
//! Message body: a protobuf-encoded `Msg` (see [`crate::protocol::schema`]).
//!
//! Stream frame:
//! ```text
//! [length:4][body:N]
//! ```
//! The length is a big-endian `u32` counting only the body.  Datagrams carry
//! the body alone; the datagram boundary is the frame.

use std::collections::BTreeMap;

use prost::Message as _;
use thiserror::Error;
use tracing::trace;

use crate::domain::event::{Event, Metric};
use crate::protocol::messages::{Message, Response, FRAME_HEADER_SIZE};
use crate::protocol::schema;

/// Errors that can occur during message encoding or decoding.
#[derive(Debug, Error, PartialEq)]
pub enum ProtocolError {
    /// The bytes do not parse as a protobuf `Msg`.
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    /// A frame body is too large to describe with the length prefix, or
    /// larger than the reader is willing to accept.
    #[error("frame too large: {size} bytes (max {max})")]
    FrameTooLarge { size: usize, max: usize },
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Encodes a [`Message`] to its protobuf body.
///
/// Encoding is deterministic: fields are written in schema order, events and
/// tags in caller order, attributes in key order.
///
/// # Examples
///
/// ```rust
/// use riemann_core::{decode_message, encode_message, Event, Message};
///
/// let msg = Message::Events(vec![Event::new().service("cpu")]);
/// let bytes = encode_message(&msg);
/// assert_eq!(decode_message(&bytes).unwrap(), msg);
/// ```
pub fn encode_message(msg: &Message) -> Vec<u8> {
    to_wire(msg).encode_to_vec()
}

/// Decodes a [`Message`] from a complete protobuf body.
///
/// A body with a query decodes to [`Message::Query`], one with `ok` or
/// `error` to [`Message::Response`], anything else to [`Message::Events`].
///
/// # Errors
///
/// Returns [`ProtocolError::MalformedMessage`] if the bytes are truncated,
/// use invalid wire types, or contain invalid UTF-8.
pub fn decode_message(bytes: &[u8]) -> Result<Message, ProtocolError> {
    let wire = schema::Msg::decode(bytes)
        .map_err(|e| ProtocolError::MalformedMessage(e.to_string()))?;
    let msg = from_wire(wire);
    trace!(len = bytes.len(), kind = msg.kind(), "decoded message");
    Ok(msg)
}

/// Prefixes `body` with its big-endian `u32` length.
///
/// The result is exactly `body.len() + 4` bytes long.
///
/// # Errors
///
/// Returns [`ProtocolError::FrameTooLarge`] if the length does not fit a `u32`.
///
/// # Examples
///
/// ```rust
/// use riemann_core::encode_frame;
///
/// let frame = encode_frame(&[0xAA, 0xBB]).unwrap();
/// assert_eq!(frame, vec![0, 0, 0, 2, 0xAA, 0xBB]);
/// ```
pub fn encode_frame(body: &[u8]) -> Result<Vec<u8>, ProtocolError> {
    let len = u32::try_from(body.len()).map_err(|_| ProtocolError::FrameTooLarge {
        size: body.len(),
        max: u32::MAX as usize,
    })?;

    let mut buf = Vec::with_capacity(FRAME_HEADER_SIZE + body.len());
    buf.extend_from_slice(&len.to_be_bytes());
    buf.extend_from_slice(body);
    Ok(buf)
}

/// Reads the body length out of a stream frame header.
pub fn decode_frame_header(header: [u8; FRAME_HEADER_SIZE]) -> usize {
    u32::from_be_bytes(header) as usize
}

// ── Domain → wire ─────────────────────────────────────────────────────────────

fn to_wire(msg: &Message) -> schema::Msg {
    match msg {
        Message::Events(events) => schema::Msg {
            events: events.iter().map(event_to_wire).collect(),
            ..schema::Msg::default()
        },
        Message::Query(query) => schema::Msg {
            query: Some(schema::Query {
                string: Some(query.clone()),
            }),
            ..schema::Msg::default()
        },
        Message::Response(response) => schema::Msg {
            ok: response.ok,
            error: response.error.clone(),
            query: None,
            events: response.events.iter().map(event_to_wire).collect(),
        },
    }
}

fn event_to_wire(event: &Event) -> schema::Event {
    let (metric_sint64, metric_d, metric_f) = match event.metric {
        Some(Metric::Int(v)) => (Some(v), None, None),
        Some(Metric::Double(v)) => (None, Some(v), None),
        Some(Metric::Float(v)) => (None, None, Some(v)),
        None => (None, None, None),
    };

    schema::Event {
        time: event.time,
        state: event.state.clone(),
        service: event.service.clone(),
        host: event.host.clone(),
        description: event.description.clone(),
        tags: event.tags.clone(),
        ttl: event.ttl,
        attributes: event
            .attributes
            .iter()
            .map(|(key, value)| schema::Attribute {
                key: key.clone(),
                value: Some(value.clone()),
            })
            .collect(),
        metric_sint64,
        metric_d,
        metric_f,
    }
}

// ── Wire → domain ─────────────────────────────────────────────────────────────

fn from_wire(wire: schema::Msg) -> Message {
    if let Some(query) = wire.query {
        return Message::Query(query.string.unwrap_or_default());
    }

    let events: Vec<Event> = wire.events.into_iter().map(event_from_wire).collect();
    if wire.ok.is_some() || wire.error.is_some() {
        Message::Response(Response {
            ok: wire.ok,
            error: wire.error,
            events,
        })
    } else {
        Message::Events(events)
    }
}

fn event_from_wire(wire: schema::Event) -> Event {
    // Same precedence the server applies when several metric fields are set.
    let metric = wire
        .metric_sint64
        .map(Metric::Int)
        .or(wire.metric_d.map(Metric::Double))
        .or(wire.metric_f.map(Metric::Float));

    let attributes: BTreeMap<String, String> = wire
        .attributes
        .into_iter()
        .map(|a| (a.key, a.value.unwrap_or_default()))
        .collect();

    Event {
        time: wire.time,
        state: wire.state,
        service: wire.service,
        host: wire.host,
        description: wire.description,
        tags: wire.tags,
        ttl: wire.ttl,
        attributes,
        metric,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
