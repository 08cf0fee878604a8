//! Infrastructure layer for the Riemann client.
//!
//! Contains the OS-facing adapters: TCP and UDP transports and the
//! configuration file loader.
//!
//! **Dependency rule**: this layer may depend on `riemann_core`, and the
//! application layer depends on the [`network::Transport`] trait defined
//! here, never on a concrete socket type.
//!
//! # Sub-modules
//!
//! - **`network`** – The `Transport` trait, the TCP stream transport (length
//!   framed, one response per request), and the UDP datagram transport
//!   (size-limited, no responses).
//!
//! - **`config`** – Optional TOML file holding host, port, transport kind,
//!   timeout, and datagram size limit.

pub mod config;
pub mod network;
