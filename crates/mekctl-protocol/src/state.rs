//! Server lifecycle states as reported by the manager.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of one managed server instance.
///
/// The manager walks a server forward along
/// `fresh → setting_up → spawning → running → stopping → cleaning_up → dead`.
/// A server whose process dies unrecoverably is reported as [`Zombie`],
/// reachable from any non-terminal state.
///
/// [`Dead`] and [`Zombie`] are terminal: no further state change is expected
/// for that id, though a `server_removed` event may still evict it from the
/// client's view.
///
/// [`Dead`]: Self::Dead
/// [`Zombie`]: Self::Zombie
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerState {
    /// Created, setup not yet started.
    Fresh,
    /// Working directory and configuration being prepared.
    SettingUp,
    /// Process launch in progress.
    Spawning,
    /// Accepting players.
    Running,
    /// Shutdown requested, process still up.
    Stopping,
    /// Process gone, working directory being removed.
    CleaningUp,
    /// Gone for good.
    Dead,
    /// Process died out from under the manager.
    Zombie,
}

impl ServerState {
    /// Wire name of this state.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fresh => "fresh",
            Self::SettingUp => "setting_up",
            Self::Spawning => "spawning",
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::CleaningUp => "cleaning_up",
            Self::Dead => "dead",
            Self::Zombie => "zombie",
        }
    }

    /// Whether no further state change is expected for this server.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Dead | Self::Zombie)
    }

    /// Position along the documented forward sequence, `None` for [`Zombie`].
    ///
    /// [`Zombie`]: Self::Zombie
    #[must_use]
    pub fn sequence_position(self) -> Option<u8> {
        match self {
            Self::Fresh => Some(0),
            Self::SettingUp => Some(1),
            Self::Spawning => Some(2),
            Self::Running => Some(3),
            Self::Stopping => Some(4),
            Self::CleaningUp => Some(5),
            Self::Dead => Some(6),
            Self::Zombie => None,
        }
    }

    /// Whether arriving at `self` from `prev` is a legal transition.
    ///
    /// Transitions are monotonic along the documented sequence (skips are
    /// tolerated); the only exception is into [`Zombie`], which is legal
    /// from any non-terminal state. Nothing follows a terminal state.
    ///
    /// [`Zombie`]: Self::Zombie
    #[must_use]
    pub fn follows(self, prev: Self) -> bool {
        if prev.is_terminal() {
            return false;
        }
        match (self.sequence_position(), prev.sequence_position()) {
            (None, _) => true,
            (Some(next), Some(before)) => next > before,
            (Some(_), None) => unreachable!("zombie is terminal"),
        }
    }
}

impl fmt::Display for ServerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_are_snake_case() {
        assert_eq!(
            serde_json::to_string(&ServerState::SettingUp).unwrap(),
            r#""setting_up""#
        );
        let state: ServerState = serde_json::from_str(r#""cleaning_up""#).unwrap();
        assert_eq!(state, ServerState::CleaningUp);
    }

    #[test]
    fn forward_moves_follow() {
        assert!(ServerState::SettingUp.follows(ServerState::Fresh));
        assert!(ServerState::Running.follows(ServerState::Spawning));
        // Skips are tolerated; the manager may coalesce steps.
        assert!(ServerState::Dead.follows(ServerState::Running));
    }

    #[test]
    fn backward_moves_do_not_follow() {
        assert!(!ServerState::Fresh.follows(ServerState::Running));
        assert!(!ServerState::Running.follows(ServerState::Running));
        assert!(!ServerState::Spawning.follows(ServerState::Stopping));
    }

    #[test]
    fn zombie_follows_any_non_terminal() {
        for state in [
            ServerState::Fresh,
            ServerState::SettingUp,
            ServerState::Spawning,
            ServerState::Running,
            ServerState::Stopping,
            ServerState::CleaningUp,
        ] {
            assert!(ServerState::Zombie.follows(state), "zombie from {state}");
        }
    }

    #[test]
    fn nothing_follows_a_terminal_state() {
        assert!(!ServerState::Zombie.follows(ServerState::Dead));
        assert!(!ServerState::Zombie.follows(ServerState::Zombie));
        assert!(!ServerState::Running.follows(ServerState::Zombie));
    }

    #[test]
    fn terminal_states() {
        assert!(ServerState::Dead.is_terminal());
        assert!(ServerState::Zombie.is_terminal());
        assert!(!ServerState::Running.is_terminal());
    }
}
