use parley_core::{ClientMessage, ConnectionId, RoomId, ServerMessage};
use tokio::sync::oneshot;

/// Commands sent to the relay loop by connection tasks.
#[derive(Debug)]
pub enum RoomCommand {
    /// The connection asked to enter a room.
    Join {
        peer_id: ConnectionId,
        room_id: RoomId,
    },

    /// Forward an already-built frame to everyone else in the room.
    Relay {
        peer_id: ConnectionId,
        room_id: RoomId,
        message: ServerMessage,
    },

    /// The WebSocket went away.
    Disconnect { peer_id: ConnectionId },

    /// Snapshot of the registry for the health endpoint.
    Stats { reply: oneshot::Sender<RelayStats> },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayStats {
    pub rooms: usize,
    pub members: usize,
}

impl RoomCommand {
    /// Stamps the sender id onto the payload and picks the matching command.
    pub fn from_client(peer_id: ConnectionId, msg: ClientMessage) -> Self {
        match msg {
            ClientMessage::JoinRoom(room_id) => RoomCommand::Join { peer_id, room_id },
            ClientMessage::Offer { room_id, offer } => RoomCommand::Relay {
                peer_id,
                room_id,
                message: ServerMessage::Offer {
                    offer,
                    from: peer_id,
                },
            },
            ClientMessage::Answer { room_id, answer } => RoomCommand::Relay {
                peer_id,
                room_id,
                message: ServerMessage::Answer {
                    answer,
                    from: peer_id,
                },
            },
            ClientMessage::IceCandidate { room_id, candidate } => RoomCommand::Relay {
                peer_id,
                room_id,
                message: ServerMessage::IceCandidate {
                    candidate,
                    from: peer_id,
                },
            },
        }
    }
}
