use crate::config::RelayConfig;
use crate::room::Relay;
use crate::shutdown::shutdown_signal;
use crate::signaling::{PeerTable, SignalingService, ws_handler};
use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::info;

#[derive(Debug, Serialize)]
struct HealthReport {
    status: &'static str,
    connections: usize,
    rooms: usize,
    members: usize,
}

/// Starts the relay loop and returns the handle connection tasks talk to.
pub fn spawn_relay(config: &RelayConfig) -> SignalingService {
    let (cmd_tx, cmd_rx) = mpsc::channel(config.command_buffer.max(1));
    let peers = PeerTable::new();

    let relay = Relay::new(cmd_rx, Arc::new(peers.clone()))
        .with_leave_notifications(config.notify_on_leave);
    tokio::spawn(relay.run());

    SignalingService::new(peers, cmd_tx)
}

pub fn router(service: SignalingService, config: &RelayConfig) -> Result<Router> {
    let cors = config.cors_layer()?;

    Ok(Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(service))
}

async fn health_handler(State(service): State<SignalingService>) -> impl IntoResponse {
    match service.relay_stats().await {
        Some(stats) => (
            StatusCode::OK,
            Json(HealthReport {
                status: "ok",
                connections: service.connection_count(),
                rooms: stats.rooms,
                members: stats.members,
            }),
        ),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthReport {
                status: "relay unavailable",
                connections: service.connection_count(),
                rooms: 0,
                members: 0,
            }),
        ),
    }
}

/// Serves the relay on an already-bound listener until `shutdown` resolves.
pub async fn run<F>(listener: TcpListener, config: RelayConfig, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    config.validate()?;

    let service = spawn_relay(&config);
    let app = router(service, &config)?;

    let addr = listener.local_addr().context("Listener has no local address")?;
    info!("Signaling server running on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("Signaling server failed")?;

    info!("Signaling server stopped");
    Ok(())
}

/// Binds the configured address and serves until Ctrl+C / SIGTERM.
pub async fn serve(config: RelayConfig) -> Result<()> {
    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    run(listener, config, shutdown_signal()).await
}
