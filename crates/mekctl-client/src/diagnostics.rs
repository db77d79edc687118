//! Injectable diagnostics for protocol-level faults.
//!
//! The dispatcher reports everything it drops or survives through this
//! capability instead of a process-wide logging surface, so tests can
//! assert on unknown kinds, malformed frames, and listener failures.
//! Production code uses [`TracingDiagnostics`]; tests use
//! [`RecordingDiagnostics`].

use mekctl_protocol::DecodeError;
use parking_lot::Mutex;

/// Sink for dispatcher-level diagnostic events.
///
/// All methods default to no-ops so implementations can observe only what
/// they care about.
pub trait Diagnostics: Send + Sync + 'static {
    /// A frame carried an `event_type` this client does not know.
    ///
    /// Forward-compatibility case: the frame is dropped, never escalated.
    fn unknown_event_kind(&self, kind: &str, raw: &str) {
        let _ = (kind, raw);
    }

    /// A frame failed to decode as the expected structure.
    ///
    /// Protocol fault: the frame is dropped, the dispatcher keeps running.
    fn malformed_frame(&self, error: &DecodeError, raw: &str) {
        let _ = (error, raw);
    }

    /// A binary frame arrived on a text protocol and was dropped.
    fn binary_frame_dropped(&self, len: usize) {
        let _ = len;
    }

    /// A listener panicked while handling an event.
    ///
    /// The panic was contained; remaining listeners still ran.
    fn listener_panicked(&self, event_kind: &str) {
        let _ = event_kind;
    }

    /// The connection is gone and will not come back on its own.
    fn connection_lost(&self, reason: &str) {
        let _ = reason;
    }
}

/// Default diagnostics: structured `tracing` output.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn unknown_event_kind(&self, kind: &str, raw: &str) {
        tracing::debug!(kind, raw, "dropping event of unknown kind");
    }

    fn malformed_frame(&self, error: &DecodeError, raw: &str) {
        tracing::warn!(error = %error, raw, "dropping malformed frame");
    }

    fn binary_frame_dropped(&self, len: usize) {
        tracing::warn!(len, "dropping unexpected binary frame");
    }

    fn listener_panicked(&self, event_kind: &str) {
        tracing::error!(event_kind, "listener panicked during dispatch");
    }

    fn connection_lost(&self, reason: &str) {
        tracing::warn!(reason, "connection lost");
    }
}

/// Diagnostics double that records every call for assertions.
///
/// Entries are compact `kind:detail` strings in call order.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    entries: Mutex<Vec<String>>,
}

impl RecordingDiagnostics {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far, in call order.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    fn push(&self, label: &str, detail: &str) {
        self.entries.lock().push(format!("{label}:{detail}"));
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn unknown_event_kind(&self, kind: &str, _raw: &str) {
        self.push("unknown_event_kind", kind);
    }

    fn malformed_frame(&self, _error: &DecodeError, raw: &str) {
        self.push("malformed_frame", raw);
    }

    fn binary_frame_dropped(&self, len: usize) {
        self.push("binary_frame_dropped", &len.to_string());
    }

    fn listener_panicked(&self, event_kind: &str) {
        self.push("listener_panicked", event_kind);
    }

    fn connection_lost(&self, reason: &str) {
        self.push("connection_lost", reason);
    }
}
