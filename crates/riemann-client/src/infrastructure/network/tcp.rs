//! Reliable stream transport.
//!
//! State machine: `Disconnected -> Connected -> Disconnected`.
//!
//! Every request is written as `[length:4][body]` and answered by exactly one
//! frame of the same shape.  There is no pipelining: a request's response is
//! read in full before the next request is written.
//!
//! Any I/O failure or timeout drops the socket, so the next `send` starts from
//! a fresh connection.  A response that arrives whole but fails to decode
//! leaves the socket in place; the stream is still aligned on a frame
//! boundary.

use std::io;

use async_trait::async_trait;
use riemann_core::protocol::messages::FRAME_HEADER_SIZE;
use riemann_core::{decode_frame_header, decode_message, encode_frame, encode_message};
use riemann_core::{Message, ProtocolError};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time;
use tracing::{debug, info, warn};

use super::{Transport, TransportConfig, TransportError};

/// TCP transport with lazy connection.
#[derive(Debug)]
pub struct TcpTransport {
    config: TransportConfig,
    stream: Option<TcpStream>,
}

impl TcpTransport {
    /// Creates a new (not yet connected) transport.
    pub fn new(config: TransportConfig) -> Self {
        Self {
            config,
            stream: None,
        }
    }

    /// Returns `true` while a socket is held.
    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn connect(&mut self) -> Result<(), TransportError> {
        if self.stream.is_some() {
            return Ok(());
        }

        let endpoint = self.config.endpoint();
        let connect = TcpStream::connect((self.config.host.as_str(), self.config.port));
        let stream = time::timeout(self.config.timeout, connect)
            .await
            .map_err(|_| TransportError::Timeout(self.config.timeout))?
            .map_err(|source| TransportError::Connect {
                addr: endpoint.clone(),
                source,
            })?;

        // Requests are small and latency-sensitive.
        if let Err(e) = stream.set_nodelay(true) {
            debug!("could not set TCP_NODELAY on {endpoint}: {e}");
        }

        info!("connected to riemann at {endpoint} (tcp)");
        self.stream = Some(stream);
        Ok(())
    }

    async fn send(&mut self, message: &Message) -> Result<Option<Message>, TransportError> {
        let frame = encode_frame(&encode_message(message))?;
        self.connect().await?;

        let timeout = self.config.timeout;
        let max_frame_size = self.config.max_frame_size;
        let Some(stream) = self.stream.as_mut() else {
            return Err(TransportError::Closed);
        };

        debug!(kind = message.kind(), bytes = frame.len(), "sending tcp request");
        let body = match time::timeout(timeout, round_trip(stream, &frame, max_frame_size)).await {
            Ok(Ok(body)) => body,
            Ok(Err(e)) => {
                warn!("tcp request to {} failed: {e}", self.config.endpoint());
                self.stream = None;
                return Err(e);
            }
            Err(_) => {
                warn!("tcp request to {} timed out", self.config.endpoint());
                self.stream = None;
                return Err(TransportError::Timeout(timeout));
            }
        };

        let reply = decode_message(&body)?;
        debug!(kind = reply.kind(), bytes = body.len(), "received tcp response");
        Ok(Some(reply))
    }

    async fn disconnect(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            if let Err(e) = stream.shutdown().await {
                debug!("error shutting down tcp stream: {e}");
            }
            info!("disconnected from riemann at {}", self.config.endpoint());
        }
    }
}

// ── Framing ───────────────────────────────────────────────────────────────────

/// Writes one request frame and reads back one response body.
async fn round_trip<S>(
    stream: &mut S,
    frame: &[u8],
    max_frame_size: usize,
) -> Result<Vec<u8>, TransportError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    write_frame(stream, frame).await?;
    read_frame(stream, max_frame_size).await
}

/// Writes an already framed request in full.
async fn write_frame<W>(writer: &mut W, frame: &[u8]) -> Result<(), TransportError>
where
    W: AsyncWrite + Unpin,
{
    // write_all loops over short writes until the whole frame is out.
    writer.write_all(frame).await.map_err(map_io_error)?;
    writer.flush().await.map_err(map_io_error)?;
    Ok(())
}

/// Reads one `[length:4][body]` frame and returns the body.
async fn read_frame<R>(reader: &mut R, max_frame_size: usize) -> Result<Vec<u8>, TransportError>
where
    R: AsyncRead + Unpin,
{
    let mut header = [0u8; FRAME_HEADER_SIZE];
    reader.read_exact(&mut header).await.map_err(map_io_error)?;

    let len = decode_frame_header(header);
    if len > max_frame_size {
        return Err(ProtocolError::FrameTooLarge {
            size: len,
            max: max_frame_size,
        }
        .into());
    }

    let mut body = vec![0u8; len];
    reader.read_exact(&mut body).await.map_err(map_io_error)?;
    Ok(body)
}

fn map_io_error(e: io::Error) -> TransportError {
    match e.kind() {
        io::ErrorKind::UnexpectedEof
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::BrokenPipe => TransportError::Closed,
        _ => TransportError::Io(e),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
