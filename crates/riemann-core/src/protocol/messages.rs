//! Protocol message types and constants.
//!
//! A [`Message`] is the unit of transmission.  Requests carry either events
//! or a query string, never both; the server answers with a [`Response`].

use crate::domain::event::Event;

// ── Protocol constants ────────────────────────────────────────────────────────

/// Host used when none is configured.
pub const DEFAULT_HOST: &str = "localhost";

/// Port the Riemann server listens on for both TCP and UDP by default.
pub const DEFAULT_PORT: u16 = 5555;

/// Size of the big-endian length prefix on every stream frame.
pub const FRAME_HEADER_SIZE: usize = 4;

/// Largest datagram the server accepts in common deployments.
pub const DEFAULT_MAX_DATAGRAM_SIZE: usize = 16_384;

/// Upper bound on a response frame read from a stream (64 MiB).
pub const DEFAULT_MAX_FRAME_SIZE: usize = 64 * 1024 * 1024;

// ── Messages ──────────────────────────────────────────────────────────────────

/// The wire-level envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Events to be indexed by the server.
    Events(Vec<Event>),
    /// An opaque query in the server's query language.
    Query(String),
    /// The server's answer to a request.
    Response(Response),
}

impl Message {
    /// Returns `true` for requests that need the server to send something back.
    pub fn expects_response(&self) -> bool {
        matches!(self, Message::Query(_))
    }

    /// Short name used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Message::Events(_) => "events",
            Message::Query(_) => "query",
            Message::Response(_) => "response",
        }
    }
}

/// A server response.
///
/// `ok` stays an `Option` so callers can tell "absent" from `false`; both
/// count as failure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    /// Whether the server accepted the request.
    pub ok: Option<bool>,
    /// Server-supplied error text.
    pub error: Option<String>,
    /// Matching events (query responses only).
    pub events: Vec<Event>,
}

impl Response {
    /// A bare success response.
    pub fn ok() -> Self {
        Self {
            ok: Some(true),
            ..Self::default()
        }
    }

    /// A success response carrying query results.
    pub fn with_events(events: Vec<Event>) -> Self {
        Self {
            ok: Some(true),
            error: None,
            events,
        }
    }

    /// A failure response carrying the server's error text.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            ok: Some(false),
            error: Some(message.into()),
            events: Vec::new(),
        }
    }

    /// `true` only when the server explicitly set `ok`.
    pub fn is_ok(&self) -> bool {
        self.ok == Some(true)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
