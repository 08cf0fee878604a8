//! # riemann-core
//!
//! Shared library for the Riemann client containing the event model, the
//! protobuf wire schema, and the message codec.
//!
//! It has no dependencies on network sockets or async runtimes; the
//! transports in `riemann-client` build on top of it.
//!
//! # Architecture overview (for beginners)
//!
//! [Riemann](https://riemann.io) is a monitoring server.  Clients push
//! *events* (observations such as "cpu on web-1 is at 42%") and can *query*
//! the server's index of the latest events.  Everything on the wire is a
//! protobuf `Msg`:
//!
//! - **`domain`** – The [`Event`] value and its tagged [`Metric`].  Pure data,
//!   no I/O.
//!
//! - **`protocol`** – How bytes travel over the network.  A [`Message`] is
//!   encoded to a protobuf body; stream transports prefix that body with a
//!   4-byte big-endian length, datagram transports send it bare.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `riemann_core::Event` instead of `riemann_core::domain::event::Event`.
pub use domain::event::{Event, Metric};
pub use protocol::codec::{
    decode_frame_header, decode_message, encode_frame, encode_message, ProtocolError,
};
pub use protocol::messages::{Message, Response};
