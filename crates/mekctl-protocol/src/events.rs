//! Inbound event frames pushed by the manager.
//!
//! One JSON object per text frame, discriminated by `event_type`. Events
//! carry no version or sequence number; their order is defined solely by
//! arrival order on the connection. The manager stamps extra fields (such
//! as `event_timestamp`) on every event; the decoder tolerates and ignores
//! anything it does not model.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::ids::ServerId;
use crate::info::ServerInfo;
use crate::state::ServerState;

/// Event kinds this client understands, in wire form.
pub const KNOWN_KINDS: [&str; 6] = [
    "config_changed",
    "servers_set",
    "server_added",
    "server_state_changed",
    "server_removed",
    "error",
];

/// An event pushed by the manager.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum Event {
    /// Global manager configuration changed.
    ConfigChanged {
        /// Cap on concurrently managed servers, if configured.
        #[serde(default)]
        max_servers: Option<u32>,
    },

    /// Authoritative full snapshot; replaces the client's view.
    ///
    /// Sent once on subscribe, before any incremental event.
    ServersSet {
        /// Every currently managed server.
        servers: Vec<ServerInfo>,
    },

    /// A new server is now tracked.
    ServerAdded {
        /// Descriptor of the new server.
        info: ServerInfo,
    },

    /// A tracked server transitioned to a new lifecycle state.
    ServerStateChanged {
        /// Which server.
        id: ServerId,
        /// The state it is now in.
        new_state: ServerState,
    },

    /// A server is no longer tracked.
    ServerRemoved {
        /// Which server.
        id: ServerId,
    },

    /// An operation related to a server failed on the manager side.
    Error {
        /// Which server the failure relates to.
        id: ServerId,
    },
}

impl Event {
    /// Wire discriminator of this event.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConfigChanged { .. } => "config_changed",
            Self::ServersSet { .. } => "servers_set",
            Self::ServerAdded { .. } => "server_added",
            Self::ServerStateChanged { .. } => "server_state_changed",
            Self::ServerRemoved { .. } => "server_removed",
            Self::Error { .. } => "error",
        }
    }

    /// Decode one text frame.
    ///
    /// Classifies failures so callers can apply the documented policies:
    /// an [`UnknownKind`] frame is a forward-compatibility case (log and
    /// drop), a [`Malformed`] frame is a protocol fault (log and drop,
    /// surfaced distinctly). Neither is ever silently misrouted.
    ///
    /// [`UnknownKind`]: DecodeError::UnknownKind
    /// [`Malformed`]: DecodeError::Malformed
    pub fn decode(raw: &str) -> Result<Self, DecodeError> {
        match serde_json::from_str::<Self>(raw) {
            Ok(event) => Ok(event),
            Err(source) => {
                if let Ok(value) = serde_json::from_str::<Value>(raw) {
                    if let Some(kind) = value.get("event_type").and_then(Value::as_str) {
                        if !KNOWN_KINDS.contains(&kind) {
                            return Err(DecodeError::UnknownKind {
                                kind: kind.to_owned(),
                            });
                        }
                    }
                }
                Err(DecodeError::Malformed { source })
            }
        }
    }
}

/// Why an inbound frame could not be decoded.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Valid JSON carrying an `event_type` this client does not know.
    ///
    /// Expected when the manager's protocol has grown ahead of the client.
    #[error("unknown event kind `{kind}`")]
    UnknownKind {
        /// The unrecognized discriminator value.
        kind: String,
    },

    /// The frame is not the expected structure.
    #[error("malformed event frame: {source}")]
    Malformed {
        /// Underlying deserialization failure.
        #[source]
        source: serde_json::Error,
    },
}
