//! Unreliable datagram transport.
//!
//! Each message is encoded and sent as the entire payload of one datagram;
//! the datagram boundary is the frame, so there is no length prefix.  The
//! server never answers over UDP, which has two consequences:
//!
//! - a successful `send` means "handed to the OS", not "accepted";
//! - queries are refused up front with
//!   [`TransportError::UnsupportedOperation`].
//!
//! Oversized payloads are refused before anything is transmitted.

use std::net::SocketAddr;

use async_trait::async_trait;
use riemann_core::{encode_message, Message};
use tokio::net::UdpSocket;
use tokio::time;
use tracing::{debug, info};

use super::{resolve, Transport, TransportConfig, TransportError};

/// UDP transport with lazy socket creation.
#[derive(Debug)]
pub struct UdpTransport {
    config: TransportConfig,
    socket: Option<UdpSocket>,
}

impl UdpTransport {
    /// Creates a new transport.  No socket is opened until first use.
    pub fn new(config: TransportConfig) -> Self {
        Self {
            config,
            socket: None,
        }
    }

    /// Returns `true` while a socket is held.
    pub fn is_connected(&self) -> bool {
        self.socket.is_some()
    }
}

#[async_trait]
impl Transport for UdpTransport {
    async fn connect(&mut self) -> Result<(), TransportError> {
        if self.socket.is_some() {
            return Ok(());
        }

        let remote = resolve(&self.config).await?;
        let local: SocketAddr = if remote.is_ipv4() {
            (std::net::Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (std::net::Ipv6Addr::UNSPECIFIED, 0).into()
        };

        let endpoint = self.config.endpoint();
        let socket = UdpSocket::bind(local)
            .await
            .map_err(|source| TransportError::Connect {
                addr: endpoint.clone(),
                source,
            })?;
        socket
            .connect(remote)
            .await
            .map_err(|source| TransportError::Connect {
                addr: endpoint.clone(),
                source,
            })?;

        info!("sending to riemann at {endpoint} ({remote}, udp)");
        self.socket = Some(socket);
        Ok(())
    }

    async fn send(&mut self, message: &Message) -> Result<Option<Message>, TransportError> {
        if message.expects_response() {
            return Err(TransportError::UnsupportedOperation(
                "queries need a response; use the tcp transport",
            ));
        }

        let body = encode_message(message);
        if body.len() > self.config.max_datagram_size {
            return Err(TransportError::PayloadTooLarge {
                size: body.len(),
                max: self.config.max_datagram_size,
            });
        }

        self.connect().await?;
        let Some(socket) = self.socket.as_ref() else {
            return Err(TransportError::Closed);
        };

        let timeout = self.config.timeout;
        match time::timeout(timeout, socket.send(&body)).await {
            Ok(Ok(sent)) => {
                debug!(kind = message.kind(), bytes = sent, "sent udp datagram");
                Ok(None)
            }
            Ok(Err(e)) => {
                self.socket = None;
                Err(TransportError::Io(e))
            }
            Err(_) => {
                self.socket = None;
                Err(TransportError::Timeout(timeout))
            }
        }
    }

    async fn disconnect(&mut self) {
        if self.socket.take().is_some() {
            info!("released udp socket for {}", self.config.endpoint());
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use riemann_core::{decode_message, Event};

    use super::*;

    /// Binds a loopback receiver and returns it with a transport aimed at it.
    async fn receiver_and_transport(max_datagram_size: usize) -> (UdpSocket, UdpTransport) {
        let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = receiver.local_addr().unwrap().port();
        let transport = UdpTransport::new(TransportConfig {
            host: "127.0.0.1".to_string(),
            port,
            timeout: Duration::from_secs(2),
            max_datagram_size,
            ..Default::default()
        });
        (receiver, transport)
    }

    /// Asserts that no datagram reaches `receiver` within a short window.
    async fn assert_nothing_received(receiver: &UdpSocket) {
        let mut buf = [0u8; 65_536];
        let result = time::timeout(Duration::from_millis(200), receiver.recv_from(&mut buf)).await;
        assert!(result.is_err(), "no datagram may be transmitted");
    }

    #[tokio::test]
    async fn test_send_transmits_bare_encoded_message() {
        // Arrange
        let (receiver, mut transport) = receiver_and_transport(16_384).await;
        let msg = Message::Events(vec![Event::new().service("cpu").state("ok")]);

        // Act
        let reply = transport.send(&msg).await.unwrap();
        let mut buf = [0u8; 65_536];
        let (n, _) = receiver.recv_from(&mut buf).await.unwrap();

        // Assert: no response, and the datagram is the body with no length prefix.
        assert!(reply.is_none());
        assert_eq!(&buf[..n], encode_message(&msg).as_slice());
        assert_eq!(decode_message(&buf[..n]).unwrap(), msg);
    }

    #[tokio::test]
    async fn test_payload_one_byte_over_limit_is_rejected_without_transmission() {
        // Arrange: size the limit to one byte below the encoded length.
        let msg = Message::Events(vec![Event::new().description("x".repeat(200))]);
        let encoded_len = encode_message(&msg).len();
        let (receiver, mut transport) = receiver_and_transport(encoded_len - 1).await;

        // Act
        let err = transport.send(&msg).await.unwrap_err();

        // Assert
        assert!(
            matches!(err, TransportError::PayloadTooLarge { size, max } if size == encoded_len && max == encoded_len - 1),
            "got {err:?}"
        );
        assert!(!transport.is_connected(), "no socket may be opened");
        assert_nothing_received(&receiver).await;
    }

    #[tokio::test]
    async fn test_payload_exactly_at_limit_is_sent() {
        let msg = Message::Events(vec![Event::new().description("y".repeat(100))]);
        let encoded_len = encode_message(&msg).len();
        let (receiver, mut transport) = receiver_and_transport(encoded_len).await;

        transport.send(&msg).await.unwrap();

        let mut buf = [0u8; 65_536];
        let (n, _) = receiver.recv_from(&mut buf).await.unwrap();
        assert_eq!(n, encoded_len);
    }

    #[tokio::test]
    async fn test_query_is_unsupported_and_not_transmitted() {
        // Arrange
        let (receiver, mut transport) = receiver_and_transport(16_384).await;

        // Act
        let err = transport
            .send(&Message::Query("service = \"cpu\"".to_string()))
            .await
            .unwrap_err();

        // Assert
        assert!(matches!(err, TransportError::UnsupportedOperation(_)));
        assert!(!transport.is_connected());
        assert_nothing_received(&receiver).await;
    }

    #[tokio::test]
    async fn test_connect_is_idempotent_and_disconnect_releases_socket() {
        let (_receiver, mut transport) = receiver_and_transport(16_384).await;

        transport.connect().await.unwrap();
        transport.connect().await.unwrap();
        assert!(transport.is_connected());

        transport.disconnect().await;
        transport.disconnect().await;
        assert!(!transport.is_connected());
    }

    #[tokio::test]
    async fn test_send_after_disconnect_reopens_socket() {
        let (receiver, mut transport) = receiver_and_transport(16_384).await;
        transport.connect().await.unwrap();
        transport.disconnect().await;

        transport
            .send(&Message::Events(vec![Event::new().service("again")]))
            .await
            .unwrap();

        let mut buf = [0u8; 1024];
        let (n, _) = receiver.recv_from(&mut buf).await.unwrap();
        assert!(n > 0);
        assert!(transport.is_connected());
    }
}
