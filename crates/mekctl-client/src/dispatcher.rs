//! Connection owner and event fan-out.
//!
//! One dispatcher per connection. A single background I/O task owns the
//! transport: it forwards queued outbound commands and decodes inbound
//! frames, dispatching each event to every registered listener in arrival
//! order and registration order, one frame fully dispatched before the
//! next is read. That task is the only reader and the only writer of the
//! connection, so no further locking discipline is needed.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use mekctl_protocol::{Command, DecodeError, Event, ServerId};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use crate::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::error::ClientError;
use crate::router::EventHandlers;
use crate::transport::{Frame, Transport, WsTransport};

type Listener = dyn Fn(&Event) + Send + Sync;

#[derive(Clone)]
struct ListenerEntry {
    id: u64,
    callback: Arc<Listener>,
}

type ListenerList = Mutex<Vec<ListenerEntry>>;

/// Client-side owner of one manager connection.
///
/// Construct via [`connect`](Self::connect) (production) or
/// [`with_transport`](Self::with_transport) (injected transport). Either
/// way the connection is already established when the value exists, so
/// there is no not-yet-open window for [`send`](Self::send).
///
/// Dropping the dispatcher closes the connection after flushing any
/// commands already handed to [`send`](Self::send).
pub struct Dispatcher {
    listeners: Arc<ListenerList>,
    next_listener_id: AtomicU64,
    cmd_tx: mpsc::UnboundedSender<String>,
    closed_rx: watch::Receiver<bool>,
    cancel: CancellationToken,
}

impl Dispatcher {
    /// Connect to the manager at `url` with default diagnostics.
    pub async fn connect(url: &str) -> Result<Self, ClientError> {
        Self::connect_with(url, Arc::new(TracingDiagnostics)).await
    }

    /// Connect to the manager at `url` with injected diagnostics.
    pub async fn connect_with(
        url: &str,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Result<Self, ClientError> {
        let transport = WsTransport::connect(url).await?;
        Ok(Self::with_transport(transport, diagnostics))
    }

    /// Build a dispatcher over an already-established transport.
    pub fn with_transport<T>(transport: T, diagnostics: Arc<dyn Diagnostics>) -> Self
    where
        T: Transport + 'static,
    {
        let listeners: Arc<ListenerList> = Arc::new(Mutex::new(Vec::new()));
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (closed_tx, closed_rx) = watch::channel(false);
        let cancel = CancellationToken::new();

        drop(tokio::spawn(run_io_loop(
            Box::new(transport),
            cmd_rx,
            Arc::clone(&listeners),
            diagnostics,
            closed_tx,
            cancel.clone(),
        )));

        Self {
            listeners,
            next_listener_id: AtomicU64::new(0),
            cmd_tx,
            closed_rx,
            cancel,
        }
    }

    /// Register a raw event listener.
    ///
    /// The listener is invoked once per inbound event, in arrival order,
    /// after every listener registered before it. The returned handle can
    /// [`cancel`](Subscription::cancel) the registration; merely dropping
    /// it leaves the listener registered for the connection's lifetime,
    /// which is what long-lived consumers want.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let id = self.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.lock().push(ListenerEntry {
            id,
            callback: Arc::new(listener),
        });
        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    /// Register a per-kind handler set (see [`EventHandlers`]).
    pub fn subscribe_handlers(&self, handlers: EventHandlers) -> Subscription {
        self.subscribe(handlers.into_listener())
    }

    /// Serialize a command and hand it to the connection immediately.
    ///
    /// Fire-and-forget: nothing waits for a confirming event. Fails with
    /// [`ClientError::ConnectionClosed`] once the connection is gone;
    /// commands are never buffered for a future reconnect.
    pub fn send(&self, command: &Command) -> Result<(), ClientError> {
        if *self.closed_rx.borrow() {
            return Err(ClientError::ConnectionClosed);
        }
        let frame = command.encode()?;
        tracing::debug!(cmd_type = command.kind(), "sending command");
        self.cmd_tx
            .send(frame)
            .map_err(|_| ClientError::ConnectionClosed)
    }

    /// Ask the manager to create a server from `server`, optionally
    /// proposing an id.
    pub fn create(&self, server: Value, id: Option<ServerId>) -> Result<(), ClientError> {
        self.send(&Command::create(server, id))
    }

    /// Ask the manager to destroy the server with `id`.
    pub fn destroy(&self, id: ServerId) -> Result<(), ClientError> {
        self.send(&Command::destroy(id))
    }

    /// Whether the connection is still open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !*self.closed_rx.borrow()
    }

    /// Resolves once the connection is gone, for any reason.
    pub async fn closed(&self) {
        let mut rx = self.closed_rx.clone();
        // An error means the I/O task is gone, which also means closed.
        let _ = rx.wait_for(|closed| *closed).await;
    }

    /// Close the connection from the client side.
    ///
    /// Commands already handed to [`send`](Self::send) are flushed first.
    pub fn close(&self) {
        self.cancel.cancel();
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Handle to one listener registration.
pub struct Subscription {
    id: u64,
    listeners: Weak<ListenerList>,
}

impl Subscription {
    /// Unregister the listener. No-op if the dispatcher is already gone.
    pub fn cancel(self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.lock().retain(|entry| entry.id != self.id);
        }
    }
}

/// The single owner of the transport for the connection's lifetime.
async fn run_io_loop(
    mut transport: Box<dyn Transport>,
    mut cmd_rx: mpsc::UnboundedReceiver<String>,
    listeners: Arc<ListenerList>,
    diagnostics: Arc<dyn Diagnostics>,
    closed_tx: watch::Sender<bool>,
    cancel: CancellationToken,
) {
    let mut client_initiated = false;
    let reason: String = loop {
        tokio::select! {
            () = cancel.cancelled() => {
                // Flush what send() already accepted, then part cleanly.
                while let Ok(frame) = cmd_rx.try_recv() {
                    if transport.send(frame).await.is_err() {
                        break;
                    }
                }
                transport.close().await;
                client_initiated = true;
                break "closed by client".to_owned();
            }
            command = cmd_rx.recv() => {
                match command {
                    Some(frame) => {
                        if let Err(error) = transport.send(frame).await {
                            break format!("send failed: {error}");
                        }
                    }
                    // All senders gone implies the dispatcher was dropped;
                    // cancellation is about to fire. Wait for it.
                    None => cancel.cancelled().await,
                }
            }
            inbound = transport.next() => {
                match inbound {
                    Some(Ok(Frame::Text(raw))) => dispatch_frame(&raw, &listeners, &*diagnostics),
                    Some(Ok(Frame::Binary(data))) => diagnostics.binary_frame_dropped(data.len()),
                    Some(Err(error)) => break format!("receive failed: {error}"),
                    None => break "closed by manager".to_owned(),
                }
            }
        }
    };
    if !client_initiated {
        diagnostics.connection_lost(&reason);
    }
    tracing::debug!(%reason, "connection finished");
    let _ = closed_tx.send(true);
}

/// Decode one frame and run every listener over the result.
///
/// Decode failures are reported and dropped; a panicking listener is
/// contained so the rest of the pass still runs.
fn dispatch_frame(raw: &str, listeners: &ListenerList, diagnostics: &dyn Diagnostics) {
    let event = match Event::decode(raw) {
        Ok(event) => event,
        Err(DecodeError::UnknownKind { kind }) => {
            diagnostics.unknown_event_kind(&kind, raw);
            return;
        }
        Err(error @ DecodeError::Malformed { .. }) => {
            diagnostics.malformed_frame(&error, raw);
            return;
        }
    };
    tracing::trace!(event_type = event.kind(), "dispatching event");

    // Snapshot outside the lock: listeners may subscribe from a callback.
    let snapshot: Vec<ListenerEntry> = listeners.lock().clone();
    for entry in snapshot {
        if catch_unwind(AssertUnwindSafe(|| (entry.callback)(&event))).is_err() {
            diagnostics.listener_panicked(event.kind());
        }
    }
}
