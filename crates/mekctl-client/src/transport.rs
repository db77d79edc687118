//! Connection seam between the dispatcher and the network.
//!
//! The dispatcher talks to a [`Transport`] trait object, so connection
//! establishment is separate from dispatcher construction and tests can
//! inject a fake. Production uses [`WsTransport`], a thin client over
//! `tokio-tungstenite`.

use async_trait::async_trait;
use futures::{SinkExt as _, StreamExt as _};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use url::Url;

use crate::error::ClientError;

/// Fixed endpoint path on the manager host.
const WS_PATH: &str = "/ws";

/// One inbound frame, as the dispatcher sees it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Frame {
    /// A text frame: one JSON-serialized event.
    Text(String),
    /// A binary frame; the protocol never sends these.
    Binary(Vec<u8>),
}

/// An established, bidirectional, ordered frame stream.
///
/// `next` must yield frames strictly in arrival order; `None` means the
/// peer closed the connection. `send` transmits immediately.
#[async_trait]
pub trait Transport: Send {
    /// Transmit one text frame.
    async fn send(&mut self, frame: String) -> Result<(), ClientError>;

    /// Receive the next frame, or `None` once the connection is closed.
    async fn next(&mut self) -> Option<Result<Frame, ClientError>>;

    /// Close the connection. Idempotent best-effort.
    async fn close(&mut self);
}

/// Production transport: one WebSocket to the manager.
pub struct WsTransport {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsTransport {
    /// Establish a connection to `url`.
    ///
    /// Completes the WebSocket handshake before returning, so a value of
    /// this type always represents an open connection.
    pub async fn connect(url: &str) -> Result<Self, ClientError> {
        let (ws, _response) =
            connect_async(url)
                .await
                .map_err(|source| ClientError::Connect {
                    url: url.to_owned(),
                    source: Box::new(source),
                })?;
        tracing::debug!(url, "websocket connected");
        Ok(Self { ws })
    }
}

#[async_trait]
impl Transport for WsTransport {
    async fn send(&mut self, frame: String) -> Result<(), ClientError> {
        self.ws
            .send(Message::Text(frame.into()))
            .await
            .map_err(|error| ClientError::Transport(error.to_string()))
    }

    async fn next(&mut self) -> Option<Result<Frame, ClientError>> {
        loop {
            match self.ws.next().await? {
                Ok(Message::Text(text)) => return Some(Ok(Frame::Text(text.as_str().to_owned()))),
                Ok(Message::Binary(data)) => return Some(Ok(Frame::Binary(data.to_vec()))),
                // Pings are answered by the library; pongs are unsolicited noise.
                Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_)) => {}
                Ok(Message::Close(_)) => return None,
                Err(error) => return Some(Err(ClientError::Transport(error.to_string()))),
            }
        }
    }

    async fn close(&mut self) {
        let _ = self.ws.close(None).await;
    }
}

/// Build the manager endpoint from a host, or pass a full URL through.
///
/// Bare `host` or `host:port` values get the fixed `ws://<host>/ws`
/// endpoint, mirroring how the browser client derives its endpoint from
/// the page host. `ws://` and `wss://` URLs are validated and returned
/// unchanged.
pub fn endpoint_url(endpoint: &str) -> Result<String, ClientError> {
    let candidate = if endpoint.starts_with("ws://") || endpoint.starts_with("wss://") {
        endpoint.to_owned()
    } else {
        format!("ws://{endpoint}{WS_PATH}")
    };
    let url = Url::parse(&candidate).map_err(|error| ClientError::InvalidEndpoint {
        endpoint: endpoint.to_owned(),
        reason: error.to_string(),
    })?;
    Ok(url.to_string())
}
