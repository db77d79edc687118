//! Subcommand implementations.

mod create;
mod destroy;
mod list;
mod watch;

use anyhow::{Context as _, Result};
use mekctl_client::{Dispatcher, endpoint_url};

use crate::cli::{Cli, CliCommand};

/// Dispatch the parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    let url = endpoint_url(&cli.endpoint())?;
    match cli.command {
        CliCommand::Watch => watch::run(&url).await,
        CliCommand::List => list::run(&url).await,
        CliCommand::Create(args) => create::run(&url, args).await,
        CliCommand::Destroy(args) => destroy::run(&url, args).await,
    }
}

/// Connect to the manager, with a readable failure message.
async fn connect(url: &str) -> Result<Dispatcher> {
    Dispatcher::connect(url)
        .await
        .with_context(|| format!("could not reach the manager at {url}"))
}
