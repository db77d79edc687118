//! `mekctl create` — ask the manager for a new server.

use std::time::Duration;

use anyhow::{Result, bail};
use mekctl_client::EventHandlers;
use mekctl_protocol::{ServerId, ServerInfo};
use serde_json::Value;
use tokio::sync::mpsc;

use crate::cli::CreateArgs;

enum Outcome {
    Added(Box<ServerInfo>),
    Failed,
}

/// Send `create_server`, optionally waiting for the confirming event.
pub async fn run(url: &str, args: CreateArgs) -> Result<()> {
    // A bare word is a configuration name; anything else must be JSON.
    let descriptor: Value = serde_json::from_str(&args.server)
        .unwrap_or_else(|_| Value::String(args.server.clone()));

    let mut id = args.id.map(ServerId::from);
    if id.is_none() && (args.propose_id || args.wait) {
        let proposed = ServerId::propose();
        println!("proposing id {proposed}");
        id = Some(proposed);
    }

    let dispatcher = super::connect(url).await?;

    if !args.wait {
        dispatcher.create(descriptor, id)?;
        return Ok(());
    }

    // Commands carry no correlation token; confirmation is the later
    // server_added / error event carrying the id we proposed.
    let Some(target) = id.clone() else {
        bail!("--wait requires an id to watch for");
    };
    let (tx, mut rx) = mpsc::unbounded_channel::<Outcome>();
    let tx_err = tx.clone();
    let added_target = target.clone();
    let error_target = target.clone();
    let _sub = dispatcher.subscribe_handlers(
        EventHandlers::new()
            .on_server_added(move |info| {
                if info.id == added_target {
                    let _ = tx.send(Outcome::Added(Box::new(info)));
                }
            })
            .on_error(move |event_id| {
                if event_id == error_target {
                    let _ = tx_err.send(Outcome::Failed);
                }
            }),
    );

    dispatcher.create(descriptor, Some(target.clone()))?;

    tokio::select! {
        outcome = rx.recv() => match outcome {
            Some(Outcome::Added(info)) => {
                println!("created {} [{}]", info.id, info.state);
                Ok(())
            }
            Some(Outcome::Failed) => bail!("the manager reported an error for {target}"),
            None => bail!("confirmation channel dropped"),
        },
        () = dispatcher.closed() => bail!("connection to the manager was lost"),
        () = tokio::time::sleep(Duration::from_secs(args.timeout)) => {
            bail!("no confirmation for {target} within {}s", args.timeout)
        }
    }
}
