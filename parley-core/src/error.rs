use thiserror::Error;

/// Errors raised while reading frames off the wire.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed signaling message: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unknown signaling event '{0}'")]
    UnknownEvent(String),
}
