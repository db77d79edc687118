//! Client error types.

use mekctl_protocol::EncodeError;
use thiserror::Error;

/// Top-level error type for the control-plane client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The WebSocket connection could not be established.
    #[error("failed to connect to {url}: {source}")]
    Connect {
        /// Endpoint we tried to reach.
        url: String,
        /// Underlying handshake failure.
        #[source]
        source: Box<tokio_tungstenite::tungstenite::Error>,
    },

    /// The endpoint could not be interpreted as a WebSocket URL.
    #[error("invalid endpoint `{endpoint}`: {reason}")]
    InvalidEndpoint {
        /// What the caller supplied.
        endpoint: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The underlying transport failed mid-session.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The connection is no longer open; the command was not sent.
    ///
    /// Sending is fail-fast by policy: nothing is buffered for a future
    /// reconnect. Callers re-establish by constructing a new dispatcher.
    #[error("connection closed")]
    ConnectionClosed,

    /// An outbound command could not be serialized.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}
