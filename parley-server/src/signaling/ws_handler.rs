use crate::room::RoomCommand;
use crate::signaling::{SignalingOutput, SignalingService};
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use parley_core::{ClientMessage, ConnectionId, ServerMessage};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(service): State<SignalingService>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, service))
}

async fn handle_socket(socket: WebSocket, service: SignalingService) {
    let peer_id = ConnectionId::new();
    info!("User connected: {}", peer_id);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    service.add_peer(peer_id, tx);
    service
        .peers()
        .send_signal(peer_id, ServerMessage::Welcome(peer_id))
        .await;

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let service = service.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match ClientMessage::from_json(text.as_str()) {
                        Ok(signal) => {
                            let cmd = RoomCommand::from_client(peer_id, signal);
                            if !service.send_command(cmd).await {
                                break;
                            }
                        }
                        Err(e) => warn!("Invalid signaling message from {}: {}", peer_id, e),
                    },
                    Message::Binary(data) => {
                        debug!("Ignoring {} byte binary frame from {}", data.len(), peer_id)
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    service.remove_peer(&peer_id);
    service
        .send_command(RoomCommand::Disconnect { peer_id })
        .await;
    info!("User disconnected: {}", peer_id);
}
