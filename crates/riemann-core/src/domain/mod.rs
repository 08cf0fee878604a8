//! Domain entities for the Riemann client.
//!
//! This module contains the event model with no wire or network dependencies.
//!
//! # What is a Riemann event? (for beginners)
//!
//! Riemann is a monitoring server that keeps an *index* of the latest state
//! of every `(host, service)` pair it has heard about.  Each observation sent
//! to it is an **event**: "the `cpu` service on `web-1` is `ok` with a metric
//! of `0.42`, valid for 60 seconds".  Every field is optional; the server
//! fills in what it needs (for example, it stamps `time` on receipt when the
//! client leaves it out).
//!
//! Code in the protocol layer converts these types to and from the protobuf
//! schema, but the domain never depends on the encoding.

/// The event model: [`event::Event`] and its tagged [`event::Metric`].
pub mod event;
