//! Channel-backed fake transport for dispatcher tests.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::ClientError;
use crate::transport::{Frame, Transport};

/// In-memory [`Transport`]: the test pushes inbound frames and reads back
/// whatever the dispatcher sends.
pub(crate) struct FakeTransport {
    incoming: mpsc::UnboundedReceiver<Frame>,
    sent_tx: mpsc::UnboundedSender<String>,
}

/// Test-side handle to a [`FakeTransport`].
pub(crate) struct FakeHandle {
    incoming_tx: Option<mpsc::UnboundedSender<Frame>>,
    sent_rx: mpsc::UnboundedReceiver<String>,
}

pub(crate) fn fake_transport() -> (FakeTransport, FakeHandle) {
    let (incoming_tx, incoming) = mpsc::unbounded_channel();
    let (sent_tx, sent_rx) = mpsc::unbounded_channel();
    (
        FakeTransport { incoming, sent_tx },
        FakeHandle {
            incoming_tx: Some(incoming_tx),
            sent_rx,
        },
    )
}

impl FakeHandle {
    /// Deliver one inbound text frame.
    pub fn push_text(&self, raw: &str) {
        if let Some(tx) = &self.incoming_tx {
            let _ = tx.send(Frame::Text(raw.to_owned()));
        }
    }

    /// Deliver one inbound binary frame.
    pub fn push_binary(&self, data: &[u8]) {
        if let Some(tx) = &self.incoming_tx {
            let _ = tx.send(Frame::Binary(data.to_vec()));
        }
    }

    /// Close the connection from the peer side.
    pub fn end(&mut self) {
        let _ = self.incoming_tx.take();
    }

    /// Next frame the dispatcher wrote, or `None` if it is gone.
    pub async fn next_sent(&mut self) -> Option<String> {
        self.sent_rx.recv().await
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&mut self, frame: String) -> Result<(), ClientError> {
        self.sent_tx
            .send(frame)
            .map_err(|_| ClientError::Transport("fake sink closed".to_owned()))
    }

    async fn next(&mut self) -> Option<Result<Frame, ClientError>> {
        self.incoming.recv().await.map(Ok)
    }

    async fn close(&mut self) {
        self.incoming.close();
    }
}
