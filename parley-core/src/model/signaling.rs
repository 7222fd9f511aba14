use crate::error::ProtocolError;
use crate::model::connection::ConnectionId;
use crate::model::payload::Payload;
use crate::model::room::RoomId;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Frames a browser sends to the relay.
///
/// On the wire every frame is `{"event": "<name>", "data": <payload>}`.
/// Session descriptions and candidates stay [`Payload`]s; the relay never
/// looks inside them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientMessage {
    JoinRoom(RoomId),
    Offer {
        #[serde(rename = "roomId")]
        room_id: RoomId,
        offer: Payload,
    },
    Answer {
        #[serde(rename = "roomId")]
        room_id: RoomId,
        answer: Payload,
    },
    IceCandidate {
        #[serde(rename = "roomId")]
        room_id: RoomId,
        candidate: Payload,
    },
}

/// Frames the relay pushes to browsers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerMessage {
    /// First frame on every connection: the id the server assigned to it.
    Welcome(ConnectionId),
    UserJoined(ConnectionId),
    /// Only sent when leave notifications are switched on.
    UserLeft(ConnectionId),
    Offer {
        offer: Payload,
        from: ConnectionId,
    },
    Answer {
        answer: Payload,
        from: ConnectionId,
    },
    IceCandidate {
        candidate: Payload,
        from: ConnectionId,
    },
}

// Decoding goes through a plain struct: serde buffers adjacently tagged
// content that arrives before its tag, and raw payloads cannot be read back
// out of that buffer.
#[derive(Deserialize)]
struct Envelope {
    event: String,
    #[serde(default)]
    data: Payload,
}

#[derive(Deserialize)]
struct RoomData {
    #[serde(rename = "roomId")]
    room_id: RoomId,
    #[serde(default)]
    offer: Payload,
    #[serde(default)]
    answer: Payload,
    #[serde(default)]
    candidate: Payload,
}

#[derive(Deserialize)]
struct SenderData {
    from: ConnectionId,
    #[serde(default)]
    offer: Payload,
    #[serde(default)]
    answer: Payload,
    #[serde(default)]
    candidate: Payload,
}

impl ClientMessage {
    pub fn from_json(text: &str) -> Result<Self, ProtocolError> {
        let Envelope { event, data } = serde_json::from_str(text)?;
        Self::from_parts(&event, data.as_str())
    }

    fn from_parts(event: &str, data: &str) -> Result<Self, ProtocolError> {
        if event == "join-room" {
            return Ok(ClientMessage::JoinRoom(serde_json::from_str(data)?));
        }

        let make: fn(RoomData) -> Self = match event {
            "offer" => |d| ClientMessage::Offer {
                room_id: d.room_id,
                offer: d.offer,
            },
            "answer" => |d| ClientMessage::Answer {
                room_id: d.room_id,
                answer: d.answer,
            },
            "ice-candidate" => |d| ClientMessage::IceCandidate {
                room_id: d.room_id,
                candidate: d.candidate,
            },
            other => return Err(ProtocolError::UnknownEvent(other.to_owned())),
        };
        Ok(make(serde_json::from_str(data)?))
    }

    pub fn room_id(&self) -> &RoomId {
        match self {
            ClientMessage::JoinRoom(room_id)
            | ClientMessage::Offer { room_id, .. }
            | ClientMessage::Answer { room_id, .. }
            | ClientMessage::IceCandidate { room_id, .. } => room_id,
        }
    }
}

impl<'de> Deserialize<'de> for ClientMessage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let Envelope { event, data } = Envelope::deserialize(deserializer)?;
        Self::from_parts(&event, data.as_str()).map_err(de::Error::custom)
    }
}

impl ServerMessage {
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, ProtocolError> {
        let Envelope { event, data } = serde_json::from_str(text)?;
        Self::from_parts(&event, data.as_str())
    }

    fn from_parts(event: &str, data: &str) -> Result<Self, ProtocolError> {
        let peer: fn(ConnectionId) -> Self = match event {
            "welcome" => ServerMessage::Welcome,
            "user-joined" => ServerMessage::UserJoined,
            "user-left" => ServerMessage::UserLeft,
            _ => {
                let make: fn(SenderData) -> Self = match event {
                    "offer" => |d| ServerMessage::Offer {
                        offer: d.offer,
                        from: d.from,
                    },
                    "answer" => |d| ServerMessage::Answer {
                        answer: d.answer,
                        from: d.from,
                    },
                    "ice-candidate" => |d| ServerMessage::IceCandidate {
                        candidate: d.candidate,
                        from: d.from,
                    },
                    other => return Err(ProtocolError::UnknownEvent(other.to_owned())),
                };
                return Ok(make(serde_json::from_str(data)?));
            }
        };
        Ok(peer(serde_json::from_str(data)?))
    }

    pub fn event_name(&self) -> &'static str {
        match self {
            ServerMessage::Welcome(_) => "welcome",
            ServerMessage::UserJoined(_) => "user-joined",
            ServerMessage::UserLeft(_) => "user-left",
            ServerMessage::Offer { .. } => "offer",
            ServerMessage::Answer { .. } => "answer",
            ServerMessage::IceCandidate { .. } => "ice-candidate",
        }
    }
}

impl<'de> Deserialize<'de> for ServerMessage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let Envelope { event, data } = Envelope::deserialize(deserializer)?;
        Self::from_parts(&event, data.as_str()).map_err(de::Error::custom)
    }
}
