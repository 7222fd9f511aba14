use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid CORS origin '{0}'")]
    InvalidOrigin(String),

    #[error("command buffer must hold at least one command")]
    ZeroCommandBuffer,
}
