//! # mekctl-client
//!
//! Client-side dispatch layer for the MegaMek multi-server control plane.
//!
//! Data flows from network to observer:
//!
//! - **[`transport`]**: the connection seam, a [`Transport`] trait plus
//!   the production [`WsTransport`] over one WebSocket
//! - **[`dispatcher`]**: owns the connection; decodes inbound frames into
//!   [`mekctl_protocol::Event`]s and fans each one out to registered
//!   listeners in arrival order; serializes outbound commands
//! - **[`router`]**: [`EventHandlers`], a per-kind handler set with no-op
//!   defaults, dispatched by one exhaustive match on the discriminator
//! - **[`registry`]**: [`ServerRegistry`], the derived server view a
//!   typical consumer keeps (full-replace snapshots plus incremental
//!   patches)
//! - **[`diagnostics`]**: injectable [`Diagnostics`] capability for
//!   protocol faults, so tests can assert on them without a global
//!   logging surface
//!
//! One dispatcher per connection, one connection per client. Listeners are
//! pure reactive callbacks and never own dispatcher state.

#![deny(unsafe_code)]

pub mod diagnostics;
pub mod dispatcher;
pub mod error;
pub mod registry;
pub mod router;
pub mod transport;

#[cfg(test)]
mod testutil;

pub use diagnostics::{Diagnostics, RecordingDiagnostics, TracingDiagnostics};
pub use dispatcher::{Dispatcher, Subscription};
pub use error::ClientError;
pub use registry::{ServerEntry, ServerRegistry, SharedRegistry};
pub use router::EventHandlers;
pub use transport::{Frame, Transport, WsTransport, endpoint_url};
