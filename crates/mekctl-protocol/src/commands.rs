//! Outbound command frames sent to the manager.
//!
//! Commands carry no reply correlation token. Success or failure is
//! observed asynchronously through subsequent events (`server_added`,
//! `server_removed`, `error`), never through a direct response.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::ids::ServerId;

/// A command issued by the client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd_type", rename_all = "snake_case")]
pub enum Command {
    /// Ask the manager to instantiate a server.
    CreateServer {
        /// Opaque server descriptor, forwarded to the manager unmodified.
        server: Value,
        /// Client-proposed id; `null` lets the manager assign one.
        #[serde(default)]
        id: Option<ServerId>,
    },

    /// Ask the manager to tear down the server with this id.
    DestroyServer {
        /// Which server.
        id: ServerId,
    },
}

impl Command {
    /// Build a `create_server` command.
    #[must_use]
    pub fn create(server: Value, id: Option<ServerId>) -> Self {
        Self::CreateServer { server, id }
    }

    /// Build a `destroy_server` command.
    #[must_use]
    pub fn destroy(id: ServerId) -> Self {
        Self::DestroyServer { id }
    }

    /// Wire discriminator of this command.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CreateServer { .. } => "create_server",
            Self::DestroyServer { .. } => "destroy_server",
        }
    }

    /// Serialize to one text frame.
    pub fn encode(&self) -> Result<String, EncodeError> {
        serde_json::to_string(self).map_err(EncodeError)
    }
}

/// An outbound command could not be serialized.
#[derive(Debug, Error)]
#[error("failed to encode command: {0}")]
pub struct EncodeError(#[source] serde_json::Error);

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn create_round_trips_exactly() {
        let command = Command::create(json!({"name": "Alpha"}), None);
        let frame = command.encode().unwrap();

        let wire: Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(
            wire,
            json!({"cmd_type": "create_server", "server": {"name": "Alpha"}, "id": null})
        );
        // The id must be present as an explicit null, not omitted.
        assert!(wire.as_object().unwrap().contains_key("id"));

        let back: Command = serde_json::from_str(&frame).unwrap();
        assert_eq!(back, command);
    }

    #[test]
    fn create_with_proposed_id() {
        let command = Command::create(json!("duel"), Some(ServerId::from("s9")));
        let wire: Value = serde_json::from_str(&command.encode().unwrap()).unwrap();
        assert_eq!(
            wire,
            json!({"cmd_type": "create_server", "server": "duel", "id": "s9"})
        );
    }

    #[test]
    fn destroy_shape() {
        let command = Command::destroy(ServerId::from("s1"));
        let wire: Value = serde_json::from_str(&command.encode().unwrap()).unwrap();
        assert_eq!(wire, json!({"cmd_type": "destroy_server", "id": "s1"}));
    }
}
