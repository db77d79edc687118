//! `mekctl destroy` — ask the manager to tear a server down.

use std::time::Duration;

use anyhow::{Result, bail};
use mekctl_client::EventHandlers;
use mekctl_protocol::ServerId;
use tokio::sync::mpsc;

use crate::cli::DestroyArgs;

enum Outcome {
    Removed,
    Failed,
}

/// Send `destroy_server`, optionally waiting for the confirming event.
pub async fn run(url: &str, args: DestroyArgs) -> Result<()> {
    let target = ServerId::from(args.id.as_str());
    let dispatcher = super::connect(url).await?;

    if !args.wait {
        dispatcher.destroy(target)?;
        return Ok(());
    }

    let (tx, mut rx) = mpsc::unbounded_channel::<Outcome>();
    let tx_err = tx.clone();
    let removed_target = target.clone();
    let error_target = target.clone();
    let _sub = dispatcher.subscribe_handlers(
        EventHandlers::new()
            .on_server_removed(move |id| {
                if id == removed_target {
                    let _ = tx.send(Outcome::Removed);
                }
            })
            .on_error(move |id| {
                if id == error_target {
                    let _ = tx_err.send(Outcome::Failed);
                }
            }),
    );

    dispatcher.destroy(target.clone())?;

    tokio::select! {
        outcome = rx.recv() => match outcome {
            Some(Outcome::Removed) => {
                println!("destroyed {target}");
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
