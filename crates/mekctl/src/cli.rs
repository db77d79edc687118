//! Command-line interface definition.

use clap::{Args, Parser, Subcommand};

/// Default manager endpoint when neither `--url` nor `MEKCTL_URL` is set.
pub const DEFAULT_ENDPOINT: &str = "ws://127.0.0.1:8000/ws";

/// Environment variable consulted when `--url` is absent.
pub const ENDPOINT_ENV: &str = "MEKCTL_URL";

/// Console client for the MegaMek multi-server manager.
#[derive(Debug, Parser)]
#[command(name = "mekctl", about = "Console client for the MegaMek multi-server manager")]
pub struct Cli {
    /// Manager endpoint: a full ws:// URL, or host[:port] to use the
    /// fixed /ws path. Falls back to $MEKCTL_URL, then a local default.
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Log level filter when RUST_LOG is unset.
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// What to do.
    #[command(subcommand)]
    pub command: CliCommand,
}

impl Cli {
    /// Resolve the raw endpoint value: flag, environment, default.
    #[must_use]
    pub fn endpoint(&self) -> String {
        self.url
            .clone()
            .or_else(|| std::env::var(ENDPOINT_ENV).ok())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_owned())
    }
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Stream lifecycle events and keep a live server view.
    Watch,
    /// Print the current server snapshot and exit.
    List,
    /// Ask the manager to create a server.
    Create(CreateArgs),
    /// Ask the manager to destroy a server.
    Destroy(DestroyArgs),
}

/// Arguments for `mekctl create`.
#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Server descriptor: a configuration name, or a JSON object.
    pub server: String,

    /// Propose this server id instead of letting the manager assign one.
    #[arg(long)]
    pub id: Option<String>,

    /// Generate and propose a fresh id (implied by --wait without --id).
    #[arg(long)]
    pub propose_id: bool,

    /// Wait for the manager to confirm via server_added (or error).
    #[arg(long)]
    pub wait: bool,

    /// Confirmation timeout in seconds for --wait.
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,
}

/// Arguments for `mekctl destroy`.
#[derive(Debug, Args)]
pub struct DestroyArgs {
    /// Id of the server to destroy.
    pub id: String,

    /// Wait for the manager to confirm via server_removed (or error).
    #[arg(long)]
    pub wait: bool,

    /// Confirmation timeout in seconds for --wait.
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,
}
