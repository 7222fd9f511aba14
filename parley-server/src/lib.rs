//! Room-based WebRTC signaling relay.
//!
//! Browsers connect over `GET /ws`, join rooms by name and exchange SDP
//! offers, answers and ICE candidates with the other members. Payloads are
//! forwarded untouched apart from the sender's connection id.

mod config;
mod error;
mod room;
mod server;
mod shutdown;
mod signaling;

pub use config::*;
pub use error::*;
pub use room::*;
pub use server::*;
pub use shutdown::*;
pub use signaling::*;
