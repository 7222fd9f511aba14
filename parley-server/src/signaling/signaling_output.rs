use async_trait::async_trait;
use parley_core::{ConnectionId, ServerMessage};

/// Sink the relay loop writes to. The WebSocket service implements it in
/// production; tests plug in a recorder.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    /// Deliver one frame to one connection. Unknown connections are ignored.
    async fn send_signal(&self, peer_id: ConnectionId, msg: ServerMessage);

    /// Deliver the same frame to several connections.
    async fn broadcast(&self, peers: Vec<ConnectionId>, msg: ServerMessage) {
        for peer_id in peers {
            self.send_signal(peer_id, msg.clone()).await;
        }
    }
}
