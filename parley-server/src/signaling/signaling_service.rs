use crate::room::{RelayStats, RoomCommand};
use crate::signaling::SignalingOutput;
use async_trait::async_trait;
use axum::extract::ws::{Message, Utf8Bytes};
use dashmap::DashMap;
use parley_core::{ConnectionId, ServerMessage};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, warn};

/// Outbound queues of every live WebSocket, keyed by connection.
///
/// This is what the relay loop writes through. It deliberately holds no
/// command sender, so the loop stops once the last [`SignalingService`] is gone.
#[derive(Clone, Default)]
pub struct PeerTable {
    peers: Arc<DashMap<ConnectionId, mpsc::UnboundedSender<Message>>>,
}

impl PeerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, peer_id: ConnectionId, tx: mpsc::UnboundedSender<Message>) {
        self.peers.insert(peer_id, tx);
    }

    pub fn remove(&self, peer_id: &ConnectionId) {
        self.peers.remove(peer_id);
    }

    pub(crate) fn len(&self) -> usize {
        self.peers.len()
    }

    fn push_text(&self, peer_id: &ConnectionId, text: Utf8Bytes) {
        let Some(peer) = self.peers.get(peer_id) else {
            debug!("Dropping frame for disconnected user {}", peer_id);
            return;
        };
        if let Err(e) = peer.send(Message::Text(text)) {
            warn!("Failed to queue WS message for {}: {:?}", peer_id, e);
        }
    }

    fn encode(msg: &ServerMessage) -> Option<Utf8Bytes> {
        match msg.to_json() {
            Ok(json) => Some(json.into()),
            Err(e) => {
                error!("Failed to serialize {} message: {}", msg.event_name(), e);
                None
            }
        }
    }
}

#[async_trait]
impl SignalingOutput for PeerTable {
    async fn send_signal(&self, peer_id: ConnectionId, msg: ServerMessage) {
        if let Some(text) = Self::encode(&msg) {
            self.push_text(&peer_id, text);
        }
    }

    async fn broadcast(&self, peers: Vec<ConnectionId>, msg: ServerMessage) {
        let Some(text) = Self::encode(&msg) else {
            return;
        };
        for peer_id in &peers {
            self.push_text(peer_id, text.clone());
        }
    }
}

/// Handle shared by the HTTP layer and every connection task.
#[derive(Clone)]
pub struct SignalingService {
    peers: PeerTable,
    room_cmd_tx: mpsc::Sender<RoomCommand>,
}

impl SignalingService {
    pub fn new(peers: PeerTable, room_cmd_tx: mpsc::Sender<RoomCommand>) -> Self {
        Self { peers, room_cmd_tx }
    }

    pub fn peers(&self) -> &PeerTable {
        &self.peers
    }

    pub fn add_peer(&self, peer_id: ConnectionId, tx: mpsc::UnboundedSender<Message>) {
        self.peers.insert(peer_id, tx);
    }

    pub fn remove_peer(&self, peer_id: &ConnectionId) {
        self.peers.remove(peer_id);
    }

    pub fn connection_count(&self) -> usize {
        self.peers.len()
    }

    /// Hands a command to the relay loop. Returns `false` if the loop is gone.
    pub async fn send_command(&self, cmd: RoomCommand) -> bool {
        match self.room_cmd_tx.send(cmd).await {
            Ok(()) => true,
            Err(e) => {
                error!("Relay loop is gone: {}", e);
                false
            }
        }
    }

    pub async fn relay_stats(&self) -> Option<RelayStats> {
        let (reply, rx) = oneshot::channel();
        if !self.send_command(RoomCommand::Stats { reply }).await {
            return None;
        }
        rx.await.ok()
    }
}
