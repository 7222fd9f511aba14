mod connection;
mod payload;
mod room;
mod signaling;

pub use connection::ConnectionId;
pub use payload::Payload;
pub use room::RoomId;
pub use signaling::{ClientMessage, ServerMessage};
