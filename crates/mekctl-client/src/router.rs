//! Per-kind event handler sets.
//!
//! A consumer interested in one event kind should not have to handle the
//! other five. [`EventHandlers`] holds one optional callback per kind,
//! each defaulting to a no-op, and turns into a raw listener performing a
//! single exhaustive match on the discriminator. Callbacks receive the
//! kind-specific payload already destructured, not the event envelope.

use mekctl_protocol::{Event, ServerId, ServerInfo, ServerState};

type Callback<T> = Box<dyn Fn(T) + Send + Sync>;
type StateCallback = Box<dyn Fn(ServerId, ServerState) + Send + Sync>;

/// One optional callback per event kind; missing entries are no-ops.
#[derive(Default)]
pub struct EventHandlers {
    config_changed: Option<Callback<Option<u32>>>,
    servers_set: Option<Callback<Vec<ServerInfo>>>,
    server_added: Option<Callback<ServerInfo>>,
    server_state_changed: Option<StateCallback>,
    server_removed: Option<Callback<ServerId>>,
    error: Option<Callback<ServerId>>,
}

impl EventHandlers {
    /// Start an empty handler set (every kind a no-op).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// React to `config_changed` with the new server cap.
    #[must_use]
    pub fn on_config_changed<F>(mut self, f: F) -> Self
    where
        F: Fn(Option<u32>) + Send + Sync + 'static,
    {
        self.config_changed = Some(Box::new(f));
        self
    }

    /// React to `servers_set` with the full snapshot.
    #[must_use]
    pub fn on_servers_set<F>(mut self, f: F) -> Self
    where
        F: Fn(Vec<ServerInfo>) + Send + Sync + 'static,
    {
        self.servers_set = Some(Box::new(f));
        self
    }

    /// React to `server_added` with the new server's descriptor.
    #[must_use]
    pub fn on_server_added<F>(mut self, f: F) -> Self
    where
        F: Fn(ServerInfo) + Send + Sync + 'static,
    {
        self.server_added = Some(Box::new(f));
        self
    }

    /// React to `server_state_changed` with `(id, new_state)`.
    #[must_use]
    pub fn on_server_state_changed<F>(mut self, f: F) -> Self
    where
        F: Fn(ServerId, ServerState) + Send + Sync + 'static,
    {
        self.server_state_changed = Some(Box::new(f));
        self
    }

    /// React to `server_removed` with the evicted id.
    #[must_use]
    pub fn on_server_removed<F>(mut self, f: F) -> Self
    where
        F: Fn(ServerId) + Send + Sync + 'static,
    {
        self.server_removed = Some(Box::new(f));
        self
    }

    /// React to `error` with the id the failure relates to.
    #[must_use]
    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: Fn(ServerId) + Send + Sync + 'static,
    {
        self.error = Some(Box::new(f));
        self
    }

    /// Collapse into a raw listener: one exhaustive match per event.
    pub(crate) fn into_listener(self) -> impl Fn(&Event) + Send + Sync + 'static {
        move |event| match event {
            Event::ConfigChanged { max_servers } => {
                if let Some(f) = &self.config_changed {
                    f(*max_servers);
                }
            }
            Event::ServersSet { servers } => {
                if let Some(f) = &self.servers_set {
                    f(servers.clone());
                }
            }
            Event::ServerAdded { info } => {
                if let Some(f) = &self.server_added {
                    f(info.clone());
                }
            }
            Event::ServerStateChanged { id, new_state } => {
                if let Some(f) = &self.server_state_changed {
                    f(id.clone(), *new_state);
                }
            }
            Event::ServerRemoved { id } => {
                if let Some(f) = &self.server_removed {
                    f(id.clone());
                }
            }
            Event::Error { id } => {
                if let Some(f) = &self.error {
                    f(id.clone());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;

    fn recorded() -> (Arc<Mutex<Vec<String>>>, Arc<Mutex<Vec<String>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        (Arc::clone(&log), log)
    }

    #[test]
    fn empty_set_is_a_no_op_for_every_kind() {
        let listener = EventHandlers::new().into_listener();
        for event in [
            Event::ConfigChanged { max_servers: None },
            Event::ServersSet { servers: vec![] },
            Event::ServerRemoved { id: "s1".into() },
            Event::Error { id: "s1".into() },
        ] {
            listener(&event);
        }
    }

    #[test]
    fn each_kind_routes_to_its_own_callback() {
        let (log, view) = recorded();
        let log_removed = Arc::clone(&log);
        let listener = EventHandlers::new()
            .on_error({
                let log = Arc::clone(&log);
                move |id| log.lock().push(format!("error:{id}"))
            })
            .on_server_removed(move |id| log_removed.lock().push(format!("removed:{id}")))
            .into_listener();

        listener(&Event::Error { id: "s3".into() });
        listener(&Event::ServerRemoved { id: "s2".into() });
        // An error event must not be misrouted to another handler.
        assert_eq!(*view.lock(), ["error:s3", "removed:s2"]);
    }

    #[test]
    fn state_change_payload_is_destructured() {
        let (log, view) = recorded();
        let listener = EventHandlers::new()
            .on_server_state_changed(move |id, new_state| {
                log.lock().push(format!("{id}:{new_state}"));
            })
            .into_listener();

        listener(&Event::ServerStateChanged {
            id: "s1".into(),
            new_state: ServerState::Running,
        });
        assert_eq!(*view.lock(), ["s1:running"]);
    }

    #[test]
    fn snapshot_payload_is_the_server_list() {
        let (log, view) = recorded();
        let listener = EventHandlers::new()
            .on_servers_set(move |servers| {
                log.lock().push(format!("{}", servers.len()));
            })
            .into_listener();

        listener(&Event::ServersSet {
            servers: vec![ServerInfo::new("s1".into(), ServerState::Fresh)],
        });
        assert_eq!(*view.lock(), ["1"]);
    }
}
