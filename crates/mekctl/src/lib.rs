//! # mekctl
//!
//! Console client for the MegaMek multi-server manager: a thin CLI over
//! [`mekctl_client`]. The protocol and dispatch layers live in the library
//! crates; this crate is argument parsing, logging bootstrap, and output.

#![deny(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod logging;

pub use mekctl_client as client;
pub use mekctl_protocol as protocol;
