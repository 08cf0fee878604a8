//! riemann-client library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does riemann-client do? (for beginners)
//!
//! It sends monitoring events to a [Riemann](https://riemann.io) server and
//! queries the server's index:
//!
//! 1. Build an [`Event`] (service, state, metric, tags, ...).
//! 2. Hand it to a [`Client`], which wraps it in a protocol message.
//! 3. The client's transport encodes the message and sends it over TCP
//!    (length-framed, with a reply) or UDP (a single datagram, no reply).
//! 4. Over TCP the client checks the server's `ok` flag and, for queries,
//!    returns the matching events.
//!
//! ```rust,no_run
//! use riemann_client::{Client, Event, Metric, TransportConfig};
//!
//! # async fn demo() -> Result<(), riemann_client::ClientError> {
//! let mut client = Client::from_config(TransportConfig::default());
//! client
//!     .send_event(Event::new().service("cpu").state("ok").metric(Metric::Double(0.5)))
//!     .await?;
//! let events = client.query("service = \"cpu\"").await?;
//! println!("{} matching events", events.len());
//! client.close().await;
//! # Ok(())
//! # }
//! ```

/// Application layer: the client facade.
pub mod application;

/// Infrastructure layer: transports and configuration.
pub mod infrastructure;

pub use application::client::{Client, ClientError};
pub use infrastructure::config::{load_config, ClientConfigFile, ConfigError};
pub use infrastructure::network::{
    RiemannTransport, TcpTransport, Transport, TransportConfig, TransportError, TransportKind,
    UdpTransport,
};
pub use riemann_core::{Event, Message, Metric, Response};
