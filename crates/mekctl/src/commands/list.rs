//! `mekctl list` — print the subscribe-time snapshot and exit.

use std::time::Duration;

use anyhow::{Context as _, Result};
use mekctl_client::EventHandlers;
use mekctl_protocol::ServerInfo;
use tokio::sync::mpsc;
use tokio::time::timeout;

/// How long to wait for the manager's snapshot.
const SNAPSHOT_TIMEOUT: Duration = Duration::from_secs(10);

/// Print one line per managed server.
pub async fn run(url: &str) -> Result<()> {
    let dispatcher = super::connect(url).await?;

    // The manager sends servers_set once on subscribe.
    let (tx, mut rx) = mpsc::unbounded_channel::<Vec<ServerInfo>>();
    let _sub = dispatcher.subscribe_handlers(EventHandlers::new().on_servers_set(move |servers| {
        let _ = tx.send(servers);
    }));

    let servers = timeout(SNAPSHOT_TIMEOUT, rx.recv())
        .await
        .context("timed out waiting for the server snapshot")?
        .context("connection closed before the snapshot arrived")?;

    if servers.is_empty() {
        println!("no servers");
        return Ok(());
    }
    for info in servers {
        let name = info.config_name().unwrap_or("-");
        let port = info
            .port()
            .map_or_else(|| "-".to_owned(), |port| port.to_string());
        println!("{}  {:12} {:6} {}", info.id, info.state, port, name);
    }
    Ok(())
}
