//! Protocol module containing message types, the wire schema, and the codec.

pub mod codec;
pub mod messages;
pub mod schema;

pub use codec::{decode_frame_header, decode_message, encode_frame, encode_message, ProtocolError};
pub use messages::*;
