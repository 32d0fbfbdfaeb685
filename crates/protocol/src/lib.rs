//! Wire types for the droidview screen-control protocol.
//!
//! This crate contains the serde-serializable types exchanged over a device
//! screen WebSocket. They represent the protocol layer - the shapes of data
//! as they appear on the wire - and carry only the behavior the protocol
//! itself defines: semantic validation and default filling.
//!
//! One session speaks both directions:
//!
//! - client -> server: [`InputCommand`] JSON text frames
//! - server -> client: raw screen captures as binary frames, plus
//!   [`ServerMessage`] JSON text frames for acks and errors

pub mod command;
pub mod reply;

pub use command::*;
pub use reply::*;
