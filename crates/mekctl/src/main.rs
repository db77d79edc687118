//! `mekctl` binary entrypoint.

use anyhow::Result;
use clap::Parser as _;

use mekctl::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    mekctl::logging::init_subscriber(&cli.log_level);
    mekctl::commands::run(cli).await
}
