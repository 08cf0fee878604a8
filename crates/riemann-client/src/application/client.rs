//! The user-facing Riemann client.
//!
//! [`Client`] owns one [`Transport`] and an optional batch of events.  It
//! turns events and query strings into [`Message`]s, drives the transport,
//! and checks the server's `ok` flag.
//!
//! # Lifecycle
//!
//! ```text
//! Client::new(transport)  ──►  send_event / send_events / query / add + flush  ──►  close()
//! ```
//!
//! The transport owns its socket, so dropping a client (on an early `?`
//! return, a panic, or normal scope exit) always releases the connection.
//! `close()` does the same explicitly and also shuts a TCP stream down
//! cleanly.  Batched events are never flushed implicitly: a batch that is
//! still pending at `close()` is discarded.

use riemann_core::{Event, Message, Response};
use thiserror::Error;
use tracing::{debug, warn};

use crate::infrastructure::network::{
    RiemannTransport, Transport, TransportConfig, TransportError,
};

/// Errors returned by [`Client`] operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The transport failed (connection, timeout, size limit, decode, ...).
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The server answered with `ok` false or missing; carries its error text.
    #[error("server rejected request: {0}")]
    ServerRejected(String),
}

impl ClientError {
    /// `true` when the underlying failure is a connection problem.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, ClientError::Transport(e) if e.is_connection_error())
    }
}

/// A Riemann client bound to a single transport.
pub struct Client<T: Transport = RiemannTransport> {
    transport: T,
    batch: Vec<Event>,
}

impl Client<RiemannTransport> {
    /// Builds a client over the transport selected by `config`.  Does not connect.
    pub fn from_config(config: TransportConfig) -> Self {
        Self::new(RiemannTransport::from_config(config))
    }
}

impl<T: Transport> Client<T> {
    /// Creates a client that exclusively owns `transport`.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            batch: Vec::new(),
        }
    }

    /// Starts a new event with no fields set.  Performs no I/O.
    ///
    /// Fill it with the setters on [`Event`] and pass it to
    /// [`send_event`](Self::send_event) or [`add`](Self::add).
    pub fn event(&self) -> Event {
        Event::new()
    }

    /// Connects the transport now instead of on first use.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if the connection cannot be made.
    pub async fn connect(&mut self) -> Result<(), ClientError> {
        self.transport.connect().await?;
        Ok(())
    }

    /// Sends a single event.
    ///
    /// # Errors
    ///
    /// See [`send_events`](Self::send_events).
    pub async fn send_event(&mut self, event: Event) -> Result<(), ClientError> {
        self.submit(&Message::Events(vec![event])).await
    }

    /// Sends several events in one message.
    ///
    /// Over TCP, success means the server answered `ok`.  Over UDP there is
    /// no answer, so success means the datagram left without a local error.
    /// An empty sequence is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ServerRejected`] if the server refused the
    /// events, or [`ClientError::Transport`] for any transport failure.
    pub async fn send_events<I>(&mut self, events: I) -> Result<(), ClientError>
    where
        I: IntoIterator<Item = Event>,
    {
        let events: Vec<Event> = events.into_iter().collect();
        if events.is_empty() {
            return Ok(());
        }
        self.submit(&Message::Events(events)).await
    }

    /// Queries the server index and returns the matching events in order.
    ///
    /// No matches yield an empty vector, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::UnsupportedOperation`] (wrapped) over a
    /// transport that cannot carry responses, [`ClientError::ServerRejected`]
    /// for an invalid query, or [`ClientError::Transport`] otherwise.
    pub async fn query(&mut self, query: &str) -> Result<Vec<Event>, ClientError> {
        let message = Message::Query(query.to_owned());
        let Some(reply) = self.transport.send(&message).await? else {
            return Err(TransportError::UnsupportedOperation(
                "transport returned no response to a query",
            )
            .into());
        };

        let response = check_response(reply)?;
        debug!(matches = response.events.len(), "query answered");
        Ok(response.events)
    }

    /// Appends an event to the batch without any I/O.  Chainable.
    pub fn add(&mut self, event: Event) -> &mut Self {
        self.batch.push(event);
        self
    }

    /// Number of events waiting for [`flush`](Self::flush).
    pub fn batch_len(&self) -> usize {
        self.batch.len()
    }

    /// Sends the whole batch as one message and returns how many events went.
    ///
    /// The batch is cleared only on success; after a failure it is intact and
    /// the caller may retry.
    ///
    /// # Errors
    ///
    /// Same as [`send_events`](Self::send_events).
    pub async fn flush(&mut self) -> Result<usize, ClientError> {
        if self.batch.is_empty() {
            return Ok(0);
        }

        let count = self.batch.len();
        self.submit(&Message::Events(self.batch.clone())).await?;
        self.batch.clear();
        debug!(count, "flushed batch");
        Ok(count)
    }

    /// Borrows the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Disconnects the transport.  Never fails.
    ///
    /// Any unflushed batch is discarded.
    pub async fn close(mut self) {
        if !self.batch.is_empty() {
            warn!(
                discarded = self.batch.len(),
                "closing client with unflushed events"
            );
        }
        self.transport.disconnect().await;
    }

    /// Sends an events message and validates the reply, if there is one.
    async fn submit(&mut self, message: &Message) -> Result<(), ClientError> {
        if let Some(reply) = self.transport.send(message).await? {
            check_response(reply)?;
        }
        Ok(())
    }
}

/// Unwraps a reply into a successful [`Response`].
///
/// A reply that is not a response at all has no `ok` flag and is treated the
/// same as `ok = false`.
fn check_response(reply: Message) -> Result<Response, ClientError> {
    let response = match reply {
        Message::Response(response) => response,
        other => {
            warn!(kind = other.kind(), "server replied with a non-response message");
            Response::default()
        }
    };

    if response.is_ok() {
        Ok(response)
    } else {
        let error = response.error.unwrap_or_default();
        warn!("server rejected request: {error}");
        Err(ClientError::ServerRejected(error))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
