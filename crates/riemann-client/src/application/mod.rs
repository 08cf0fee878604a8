//! Application layer for the Riemann client.
//!
//! # What does the application layer do?
//!
//! - **`client`** – The [`client::Client`] facade.  It turns events and query
//!   strings into protocol messages, hands them to a transport injected at
//!   construction time, and interprets the server's reply.  It knows nothing
//!   about sockets; tests drive it with recording or mock transports.

pub mod client;
