//! # mekctl-protocol
//!
//! Wire vocabulary shared between the MegaMek multi-server manager and its
//! control-plane clients:
//!
//! - **Branded IDs**: [`ids::ServerId`] as a newtype over the manager's
//!   opaque identifier strings
//! - **Lifecycle**: [`state::ServerState`] with the documented transition
//!   sequence and terminal states
//! - **Descriptors**: [`info::ServerInfo`] with opaque configuration
//!   passthrough
//! - **Events**: [`events::Event`], the six-kind inbound union, plus
//!   decode classification ([`events::DecodeError`])
//! - **Commands**: [`commands::Command`], the two-kind outbound union
//!
//! One JSON object per text frame. Events are discriminated by
//! `event_type`, commands by `cmd_type`. This crate performs no I/O.
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by `mekctl-client` and the `mekctl` CLI.

#![deny(unsafe_code)]

pub mod commands;
pub mod events;
pub mod ids;
pub mod info;
pub mod state;

pub use commands::{Command, EncodeError};
pub use events::{DecodeError, Event};
pub use ids::ServerId;
pub use info::ServerInfo;
pub use state::ServerState;
