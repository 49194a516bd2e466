use thiserror::Error;

/// Errors raised by the transport and configuration layers.
///
/// Protocol handlers never return these to clients: every failure on the
/// signaling path degrades to a dropped event. They exist so the WebSocket
/// adapter and startup code can propagate and log what went wrong.
#[derive(Debug, Error)]
pub enum SignalingError {
    #[error("Failed to serialize message: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Outbound channel closed for connection {0}")]
    ChannelClosed(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("WebSocket error: {0}")]
    WebSocket(String),
}

/// Convenience type alias for Results using SignalingError
pub type Result<T> = std::result::Result<T, SignalingError>;

impl SignalingError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        SignalingError::Configuration(msg.into())
    }
}

impl From<warp::Error> for SignalingError {
    fn from(err: warp::Error) -> Self {
        SignalingError::WebSocket(err.to_string())
    }
}
