use crate::room::room_command::{RelayStats, RoomCommand};
use crate::room::room_registry::RoomRegistry;
use crate::signaling::SignalingOutput;
use parley_core::{ConnectionId, RoomId, ServerMessage};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Single owner of the room table. Every membership change and every
/// forwarded frame passes through [`Relay::run`], one command at a time.
pub struct Relay {
    registry: RoomRegistry,
    command_rx: mpsc::Receiver<RoomCommand>,
    signaling: Arc<dyn SignalingOutput>,
    notify_on_leave: bool,
}

impl Relay {
    pub fn new(
        command_rx: mpsc::Receiver<RoomCommand>,
        signaling: Arc<dyn SignalingOutput>,
    ) -> Self {
        Self {
            registry: RoomRegistry::new(),
            command_rx,
            signaling,
            notify_on_leave: false,
        }
    }

    /// Tell remaining room members when someone disconnects.
    pub fn with_leave_notifications(mut self, enabled: bool) -> Self {
        self.notify_on_leave = enabled;
        self
    }

    pub async fn run(mut self) {
        info!("Relay event loop started");

        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd).await;
        }

        info!(
            "Command channel closed, relay shutting down with {} room(s)",
            self.registry.room_count()
        );
    }

    async fn handle_command(&mut self, cmd: RoomCommand) {
        match cmd {
            RoomCommand::Join { peer_id, room_id } => self.join(peer_id, room_id).await,

            RoomCommand::Relay {
                peer_id,
                room_id,
                message,
            } => self.forward(peer_id, &room_id, message).await,

            RoomCommand::Disconnect { peer_id } => self.disconnect(peer_id).await,

            RoomCommand::Stats { reply } => {
                let stats = RelayStats {
                    rooms: self.registry.room_count(),
                    members: self.registry.member_count(),
                };
                let _ = reply.send(stats);
            }
        }
    }

    async fn join(&mut self, peer_id: ConnectionId, room_id: RoomId) {
        if !self.registry.join(peer_id, &room_id) {
            debug!("{} re-joined room '{}'", peer_id, room_id);
        }
        info!("User {} joined room '{}'", peer_id, room_id);

        let others = self.registry.peers_except(&room_id, &peer_id);
        if !others.is_empty() {
            self.signaling
                .broadcast(others, ServerMessage::UserJoined(peer_id))
                .await;
        }
    }

    async fn forward(&mut self, peer_id: ConnectionId, room_id: &RoomId, message: ServerMessage) {
        let targets = self.registry.peers_except(room_id, &peer_id);
        if targets.is_empty() {
            debug!(
                "Dropping {} from {}: nobody else in room '{}'",
                message.event_name(),
                peer_id,
                room_id
            );
            return;
        }

        debug!(
            "Forwarding {} from {} to {} peer(s) in '{}'",
            message.event_name(),
            peer_id,
            targets.len(),
            room_id
        );
        self.signaling.broadcast(targets, message).await;
    }

    async fn disconnect(&mut self, peer_id: ConnectionId) {
        let departures = self.registry.leave_all(&peer_id);
        info!("User {} disconnected, left {} room(s)", peer_id, departures.len());

        if !self.notify_on_leave {
            return;
        }

        for departure in departures {
            if departure.remaining.is_empty() {
                continue;
            }
            self.signaling
                .broadcast(departure.remaining, ServerMessage::UserLeft(peer_id))
                .await;
        }
    }
}
