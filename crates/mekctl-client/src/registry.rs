//! Derived server view.
//!
//! The typical consumer of the event stream keeps a local registry of
//! managed servers: `servers_set` replaces it wholesale, the incremental
//! events patch it. The manager is authoritative; arrivals that violate
//! the documented lifecycle are logged at warn level and then applied
//! anyway.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use mekctl_protocol::{Event, ServerId, ServerInfo, ServerState};
use parking_lot::{RwLock, RwLockReadGuard};

use crate::dispatcher::{Dispatcher, Subscription};

/// One tracked server plus when this client last saw it change.
#[derive(Clone, Debug, PartialEq)]
pub struct ServerEntry {
    /// Latest descriptor.
    pub info: ServerInfo,
    /// Arrival time of the last event that touched this entry.
    pub updated_at: DateTime<Utc>,
}

/// Client-side registry of managed servers, derived from the event stream.
#[derive(Debug, Default)]
pub struct ServerRegistry {
    servers: BTreeMap<ServerId, ServerEntry>,
    max_servers: Option<u32>,
}

impl ServerRegistry {
    /// Start empty; the subscribe-time `servers_set` fills it.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event into the view.
    pub fn apply(&mut self, event: &Event) {
        let now = Utc::now();
        match event {
            Event::ConfigChanged { max_servers } => self.max_servers = *max_servers,
            Event::ServersSet { servers } => {
                self.servers = servers
                    .iter()
                    .map(|info| {
                        (
                            info.id.clone(),
                            ServerEntry {
                                info: info.clone(),
                                updated_at: now,
                            },
                        )
                    })
                    .collect();
            }
            Event::ServerAdded { info } => {
                let replaced = self.servers.insert(
                    info.id.clone(),
                    ServerEntry {
                        info: info.clone(),
                        updated_at: now,
                    },
                );
                if replaced.is_some() {
                    tracing::warn!(id = %info.id, "server_added for an id already tracked");
                }
            }
            Event::ServerStateChanged { id, new_state } => {
                if let Some(entry) = self.servers.get_mut(id) {
                    if !new_state.follows(entry.info.state) {
                        tracing::warn!(
                            %id,
                            from = %entry.info.state,
                            to = %new_state,
                            "state transition violates the documented sequence"
                        );
                    }
                    entry.info.state = *new_state;
                    entry.updated_at = now;
                } else {
                    tracing::warn!(%id, state = %new_state, "state change for an untracked server");
                    let _ = self.servers.insert(
                        id.clone(),
                        ServerEntry {
                            info: ServerInfo::new(id.clone(), *new_state),
                            updated_at: now,
                        },
                    );
                }
            }
            Event::ServerRemoved { id } => {
                if self.servers.remove(id).is_none() {
                    tracing::warn!(%id, "removal for an untracked server");
                }
            }
            // Errors are not registry state; they belong to whoever
            // registered an error handler.
            Event::Error { .. } => {}
        }
    }

    /// Entry for `id`, if tracked.
    #[must_use]
    pub fn get(&self, id: &ServerId) -> Option<&ServerEntry> {
        self.servers.get(id)
    }

    /// Current state of `id`, if tracked.
    #[must_use]
    pub fn state_of(&self, id: &ServerId) -> Option<ServerState> {
        self.servers.get(id).map(|entry| entry.info.state)
    }

    /// All tracked servers, ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &ServerEntry> {
        self.servers.values()
    }

    /// Number of tracked servers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.servers.len()
    }

    /// Whether no servers are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    /// Manager-wide cap on concurrent servers, when known.
    #[must_use]
    pub fn max_servers(&self) -> Option<u32> {
        self.max_servers
    }
}

/// Shareable registry that plugs straight into a dispatcher.
#[derive(Clone, Debug, Default)]
pub struct SharedRegistry {
    inner: Arc<RwLock<ServerRegistry>>,
}

impl SharedRegistry {
    /// Create an empty shared registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe the registry to `dispatcher`'s event stream.
    ///
    /// Register before other listeners that read the registry, so their
    /// view already includes the event being dispatched.
    pub fn attach(&self, dispatcher: &Dispatcher) -> Subscription {
        let inner = Arc::clone(&self.inner);
        dispatcher.subscribe(move |event| inner.write().apply(event))
    }

    /// Read access to the current view.
    pub fn read(&self) -> RwLockReadGuard<'_, ServerRegistry> {
        self.inner.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_event(entries: &[(&str, ServerState)]) -> Event {
        Event::ServersSet {
            servers: entries
                .iter()
                .map(|(id, state)| ServerInfo::new((*id).into(), *state))
                .collect(),
        }
    }

    #[test]
    fn snapshot_then_patch_yields_the_patched_view() {
        let mut registry = ServerRegistry::new();
        registry.apply(&set_event(&[("s1", ServerState::Fresh)]));
        registry.apply(&Event::ServerStateChanged {
            id: "s1".into(),
            new_state: ServerState::Running,
        });

        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.state_of(&"s1".into()),
            Some(ServerState::Running)
        );
    }

    #[test]
    fn added_then_removed_leaves_no_entry() {
        let mut registry = ServerRegistry::new();
        registry.apply(&Event::ServerAdded {
            info: ServerInfo::new("s2".into(), ServerState::Fresh),
        });
        registry.apply(&Event::ServerRemoved { id: "s2".into() });

        assert!(registry.get(&"s2".into()).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn snapshot_replaces_everything() {
        let mut registry = ServerRegistry::new();
        registry.apply(&set_event(&[
            ("s1", ServerState::Running),
            ("s2", ServerState::Fresh),
        ]));
        registry.apply(&set_event(&[("s3", ServerState::Spawning)]));

        assert_eq!(registry.len(), 1);
        assert!(registry.get(&"s1".into()).is_none());
        assert_eq!(
            registry.state_of(&"s3".into()),
            Some(ServerState::Spawning)
        );
    }

    #[test]
    fn violating_transitions_are_still_applied() {
        let mut registry = ServerRegistry::new();
        registry.apply(&set_event(&[("s1", ServerState::Running)]));
        // Backward along the sequence: logged, but the manager wins.
        registry.apply(&Event::ServerStateChanged {
            id: "s1".into(),
            new_state: ServerState::Fresh,
        });
        assert_eq!(registry.state_of(&"s1".into()), Some(ServerState::Fresh));
    }

    #[test]
    fn untracked_state_change_starts_tracking() {
        let mut registry = ServerRegistry::new();
        registry.apply(&Event::ServerStateChanged {
            id: "s7".into(),
            new_state: ServerState::Zombie,
        });
        assert_eq!(registry.state_of(&"s7".into()), Some(ServerState::Zombie));
    }

    #[test]
    fn error_events_do_not_touch_the_view() {
        let mut registry = ServerRegistry::new();
        registry.apply(&set_event(&[("s1", ServerState::Running)]));
        registry.apply(&Event::Error { id: "s1".into() });
        assert_eq!(registry.state_of(&"s1".into()), Some(ServerState::Running));
    }

    #[test]
    fn config_cap_is_cached() {
        let mut registry = ServerRegistry::new();
        assert_eq!(registry.max_servers(), None);
        registry.apply(&Event::ConfigChanged {
            max_servers: Some(4),
        });
        assert_eq!(registry.max_servers(), Some(4));
    }
}
