use anyhow::{Context, Result};
use clap::Parser;
use parley_server::{DEFAULT_COMMAND_BUFFER, DEFAULT_PORT, RelayConfig};
use std::net::IpAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// WebRTC signaling relay.
///
/// Peers join rooms over a WebSocket and trade SDP offers, answers and ICE
/// candidates with the other members of the room.
#[derive(Parser, Debug)]
#[command(name = "parley", version, about, long_about = None)]
struct Cli {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0", env = "PARLEY_HOST")]
    host: IpAddr,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "PORT")]
    port: u16,

    /// Tell remaining room members when a peer disconnects (`user-left`)
    #[arg(long, default_value_t = false, env = "PARLEY_NOTIFY_ON_LEAVE")]
    notify_on_leave: bool,

    /// Allowed CORS origins (comma-separated). Any origin when empty
    #[arg(long = "allow-origin", value_delimiter = ',', env = "PARLEY_ALLOWED_ORIGINS")]
    allowed_origins: Vec<String>,

    /// Capacity of the relay command queue
    #[arg(long, default_value_t = DEFAULT_COMMAND_BUFFER, env = "PARLEY_COMMAND_BUFFER")]
    command_buffer: usize,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn relay_config(&self) -> RelayConfig {
        RelayConfig {
            host: self.host,
            port: self.port,
            notify_on_leave: self.notify_on_leave,
            allowed_origins: self.allowed_origins.clone(),
            command_buffer: self.command_buffer,
        }
    }
}

fn init_tracing(default_filter: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter)
            .with_context(|| format!("Invalid log filter '{}'", default_filter))?,
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    let config = cli.relay_config();
    info!(
        "Starting parley on {} (leave notifications: {})",
        config.socket_addr(),
        if config.notify_on_leave { "on" } else { "off" }
    );

    parley_server::serve(config).await
}
