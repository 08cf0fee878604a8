//! Network infrastructure: the transport seam and its two implementations.
//!
//! Architecture:
//! - [`Transport`] is the capability set every transport offers:
//!   `connect`, `send`, `disconnect`.
//! - [`tcp::TcpTransport`] is reliable: every request gets exactly one framed
//!   response.
//! - [`udp::UdpTransport`] is fire-and-forget: one datagram per request, no
//!   response, no queries.
//! - [`RiemannTransport`] is the closed set of the two, chosen from a
//!   [`TransportConfig`].
//!
//! # TCP vs UDP for monitoring (for beginners)
//!
//! TCP guarantees that bytes arrive in order, so the server can reply to
//! every message and the client learns whether its events were accepted.
//! UDP sends each message as a single packet with no acknowledgement: it is
//! cheaper, but a lost or rejected packet goes unnoticed.  That is why only
//! the TCP transport can carry queries.

pub mod tcp;
pub mod udp;

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use riemann_core::protocol::messages::{
    DEFAULT_HOST, DEFAULT_MAX_DATAGRAM_SIZE, DEFAULT_MAX_FRAME_SIZE, DEFAULT_PORT,
};
use riemann_core::{Message, ProtocolError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::time;

pub use tcp::TcpTransport;
pub use udp::UdpTransport;

/// Errors that can occur in the transport layer.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Name resolution or connection setup failed.
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    /// An I/O error occurred on an established connection.
    #[error("connection I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The server closed the connection before a full response arrived.
    #[error("connection closed by server")]
    Closed,
    /// Connect or the request/response round trip exceeded the deadline.
    #[error("operation timed out after {0:?}")]
    Timeout(Duration),
    /// The response could not be decoded.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    /// The encoded datagram exceeds the configured maximum.
    #[error("payload too large: {size} bytes (max {max})")]
    PayloadTooLarge { size: usize, max: usize },
    /// The transport cannot carry this kind of request.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),
}

impl TransportError {
    /// `true` for failures of the connection itself (refused, reset,
    /// premature close, timeout) as opposed to bad data or bad requests.
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            TransportError::Connect { .. }
                | TransportError::Io(_)
                | TransportError::Closed
                | TransportError::Timeout(_)
        )
    }
}

/// The capability set shared by every transport.
///
/// Methods take `&mut self`: a transport serves one client and never sees
/// overlapping requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send {
    /// Establishes the connection.  Calling it while connected is a no-op.
    async fn connect(&mut self) -> Result<(), TransportError>;

    /// Sends one message, connecting first if needed.
    ///
    /// Returns the server's reply for transports that receive one, `None`
    /// for transports that do not.
    async fn send(&mut self, message: &Message) -> Result<Option<Message>, TransportError>;

    /// Releases the connection.  Idempotent and infallible.
    async fn disconnect(&mut self);
}

// ── Configuration ─────────────────────────────────────────────────────────────

/// Which transport to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Reliable, length-framed stream with responses.
    #[default]
    Tcp,
    /// Unreliable datagrams without responses.
    Udp,
}

/// Fully resolved transport settings.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportConfig {
    /// Server hostname or IP address.
    pub host: String,
    /// Server port (TCP and UDP share the default).
    pub port: u16,
    /// Transport selection.
    pub kind: TransportKind,
    /// Deadline for connecting and for each request/response round trip.
    pub timeout: Duration,
    /// Largest datagram the UDP transport will send.
    pub max_datagram_size: usize,
    /// Largest response frame the TCP transport will read.
    pub max_frame_size: usize,
}

impl Default for TransportConfig {
    /// | Field             | Default       |
    /// |-------------------|---------------|
    /// | host              | `localhost`   |
    /// | port              | `5555`        |
    /// | kind              | `Tcp`         |
    /// | timeout           | 5 seconds     |
    /// | max_datagram_size | 16384 bytes   |
    /// | max_frame_size    | 64 MiB        |
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            kind: TransportKind::Tcp,
            timeout: Duration::from_secs(5),
            max_datagram_size: DEFAULT_MAX_DATAGRAM_SIZE,
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }
}

impl TransportConfig {
    /// `host:port` as written in log lines and errors.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// ── Transport selection ───────────────────────────────────────────────────────

/// The transports a client can be configured with.
#[derive(Debug)]
pub enum RiemannTransport {
    Tcp(TcpTransport),
    Udp(UdpTransport),
}

impl RiemannTransport {
    /// Builds the transport named by `config.kind`.  Does not connect.
    pub fn from_config(config: TransportConfig) -> Self {
        match config.kind {
            TransportKind::Tcp => RiemannTransport::Tcp(TcpTransport::new(config)),
            TransportKind::Udp => RiemannTransport::Udp(UdpTransport::new(config)),
        }
    }

    /// The kind of the wrapped transport.
    pub fn kind(&self) -> TransportKind {
        match self {
            RiemannTransport::Tcp(_) => TransportKind::Tcp,
            RiemannTransport::Udp(_) => TransportKind::Udp,
        }
    }
}

#[async_trait]
impl Transport for RiemannTransport {
    async fn connect(&mut self) -> Result<(), TransportError> {
        match self {
            RiemannTransport::Tcp(t) => t.connect().await,
            RiemannTransport::Udp(t) => t.connect().await,
        }
    }

    async fn send(&mut self, message: &Message) -> Result<Option<Message>, TransportError> {
        match self {
            RiemannTransport::Tcp(t) => t.send(message).await,
            RiemannTransport::Udp(t) => t.send(message).await,
        }
    }

    async fn disconnect(&mut self) {
        match self {
            RiemannTransport::Tcp(t) => t.disconnect().await,
            RiemannTransport::Udp(t) => t.disconnect().await,
        }
    }
}

/// Resolves `host:port`, preferring an IPv4 address when both families exist.
async fn resolve(config: &TransportConfig) -> Result<SocketAddr, TransportError> {
    let endpoint = config.endpoint();
    let lookup = tokio::net::lookup_host((config.host.as_str(), config.port));
    let addrs: Vec<SocketAddr> = time::timeout(config.timeout, lookup)
        .await
        .map_err(|_| TransportError::Timeout(config.timeout))?
        .map_err(|source| TransportError::Connect {
            addr: endpoint.clone(),
            source,
        })?
        .collect();

    addrs
        .iter()
        .find(|a| a.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
        .ok_or_else(|| TransportError::Connect {
            addr: endpoint,
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no addresses resolved"),
        })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_config_defaults() {
        // Arrange / Act
        let cfg = TransportConfig::default();

        // Assert
        assert_eq!(cfg.host, "localhost");
        assert_eq!(cfg.port, 5555);
        assert_eq!(cfg.kind, TransportKind::Tcp);
        assert_eq!(cfg.max_datagram_size, 16384);
        assert_eq!(cfg.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_endpoint_joins_host_and_port() {
        let cfg = TransportConfig {
            host: "riemann.internal".to_string(),
            port: 5556,
            ..Default::default()
        };
        assert_eq!(cfg.endpoint(), "riemann.internal:5556");
    }

    #[test]
    fn test_from_config_selects_tcp_by_default() {
        let transport = RiemannTransport::from_config(TransportConfig::default());
        assert_eq!(transport.kind(), TransportKind::Tcp);
    }

    #[test]
    fn test_from_config_selects_udp() {
        let cfg = TransportConfig {
            kind: TransportKind::Udp,
            ..Default::default()
        };
        let transport = RiemannTransport::from_config(cfg);
        assert_eq!(transport.kind(), TransportKind::Udp);
    }

    #[test]
    fn test_connection_error_classification() {
        assert!(TransportError::Closed.is_connection_error());
        assert!(TransportError::Timeout(Duration::from_secs(1)).is_connection_error());
        assert!(!TransportError::PayloadTooLarge { size: 2, max: 1 }.is_connection_error());
        assert!(!TransportError::UnsupportedOperation("query").is_connection_error());
        assert!(
            !TransportError::Protocol(ProtocolError::MalformedMessage("x".into()))
                .is_connection_error()
        );
    }

    #[tokio::test]
    async fn test_resolve_loopback_literal() {
        let cfg = TransportConfig {
            host: "127.0.0.1".to_string(),
            port: 5555,
            ..Default::default()
        };
        let addr = resolve(&cfg).await.unwrap();
        assert_eq!(addr, "127.0.0.1:5555".parse::<SocketAddr>().unwrap());
    }

    #[tokio::test]
    async fn test_resolve_invalid_host_is_connect_error() {
        let cfg = TransportConfig {
            host: "definitely not a hostname".to_string(),
            ..Default::default()
        };
        let err = resolve(&cfg).await.unwrap_err();
        assert!(
            matches!(err, TransportError::Connect { .. } | TransportError::Timeout(_)),
            "unexpected error: {err:?}"
        );
    }
}
