use crate::error::ConfigError;
use axum::http::HeaderValue;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_COMMAND_BUFFER: usize = 256;

/// Everything the relay can be tuned with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Send `user-left` to remaining members when a connection drops.
    pub notify_on_leave: bool,
    /// Empty means any origin.
    pub allowed_origins: Vec<String>,
    /// Capacity of the channel feeding the relay loop.
    pub command_buffer: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            notify_on_leave: false,
            allowed_origins: Vec::new(),
            command_buffer: DEFAULT_COMMAND_BUFFER,
        }
    }
}

impl RelayConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.command_buffer == 0 {
            return Err(ConfigError::ZeroCommandBuffer);
        }
        self.cors_layer().map(|_| ())
    }

    pub fn cors_layer(&self) -> Result<CorsLayer, ConfigError> {
        let origin = if self.allowed_origins.is_empty() {
            AllowOrigin::from(Any)
        } else {
            let origins = self
                .allowed_origins
                .iter()
                .map(|origin| {
                    HeaderValue::from_str(origin)
                        .map_err(|_| ConfigError::InvalidOrigin(origin.clone()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            AllowOrigin::list(origins)
        };

        Ok(CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any))
    }
}
