//! `mekctl watch` — stream events until the connection ends.

use anyhow::{Result, bail};
use mekctl_client::{EventHandlers, SharedRegistry};

/// Print every lifecycle event as it arrives, with a derived view on hand.
pub async fn run(url: &str) -> Result<()> {
    let dispatcher = super::connect(url).await?;

    // Attached first, so the print handlers below see an updated view.
    let registry = SharedRegistry::new();
    let _registry_sub = registry.attach(&dispatcher);

    let registry_set = registry.clone();
    let _sub = dispatcher.subscribe_handlers(
        EventHandlers::new()
            .on_config_changed(|max_servers| match max_servers {
                Some(cap) => println!("config changed: max_servers={cap}"),
                None => println!("config changed: max_servers unset"),
            })
            .on_servers_set(move |servers| {
                println!("snapshot: {} server(s)", servers.len());
                for entry in registry_set.read().iter() {
                    println!("  {}", describe(&entry.info));
                }
            })
            .on_server_added(|info| println!("added: {}", describe(&info)))
            .on_server_state_changed(|id, new_state| println!("{id} -> {new_state}"))
            .on_server_removed(|id| println!("removed: {id}"))
            .on_error(|id| println!("manager error for {id}")),
    );

    tokio::select! {
        () = dispatcher.closed() => bail!("connection to the manager was lost"),
        result = tokio::signal::ctrl_c() => {
            result?;
            tracing::info!("interrupted, closing");
            Ok(())
        }
    }
}

fn describe(info: &mekctl_protocol::ServerInfo) -> String {
    let mut line = format!("{} [{}]", info.id, info.state);
    if let Some(name) = info.config_name() {
        line.push_str(&format!(" {name}"));
    }
    if let Some(port) = info.port() {
        line.push_str(&format!(" :{port}"));
    }
    line
}
