//! Server instance descriptors.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ids::ServerId;
use crate::state::ServerState;

/// Descriptor plus current lifecycle state for one managed server instance.
///
/// Only `id` and `state` are interpreted by the control plane. Everything
/// else the manager attaches (configuration name, game version, port,
/// creator, creation timestamp, ...) is kept as opaque JSON and passed
/// through unmodified, so the client stays compatible as the manager grows
/// its descriptor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Manager-assigned identifier.
    pub id: ServerId,
    /// Current lifecycle state.
    pub state: ServerState,
    /// Remaining descriptor fields, untouched.
    #[serde(flatten)]
    pub config: Map<String, Value>,
}

impl ServerInfo {
    /// Build a descriptor carrying only the interpreted fields.
    #[must_use]
    pub fn new(id: ServerId, state: ServerState) -> Self {
        Self {
            id,
            state,
            config: Map::new(),
        }
    }

    /// Configuration name, when the manager included one.
    #[must_use]
    pub fn config_name(&self) -> Option<&str> {
        self.config.get("config_name").and_then(Value::as_str)
    }

    /// Game port, when the manager included one.
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.config
            .get("port")
            .and_then(Value::as_u64)
            .and_then(|port| u16::try_from(port).ok())
    }
}
