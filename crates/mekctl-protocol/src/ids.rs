//! Branded ID newtype for managed server instances.
//!
//! The manager assigns every server an opaque stable identifier and is the
//! only party that interprets it. Clients carry the identifier around as an
//! uninspected string; the newtype prevents it from being confused with any
//! other string-shaped value.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier of one managed server instance.
///
/// Unique among live and recently-removed servers. Normally assigned by the
/// manager; a client may propose its own via [`ServerId::propose`] when
/// creating a server.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerId(String);

impl ServerId {
    /// Generate a fresh id suitable for a client-side proposal.
    ///
    /// Uses UUID v4, matching the manager's own id space.
    #[must_use]
    pub fn propose() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Return the inner string as a slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume self and return the inner `String`.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for ServerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ServerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ServerId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<ServerId> for String {
    fn from(id: ServerId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_transparently() {
        let id = ServerId::from("s1");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""s1""#);
        let back: ServerId = serde_json::from_str(r#""s1""#).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn proposed_ids_are_distinct() {
        let a = ServerId::propose();
        let b = ServerId::propose();
        assert_ne!(a, b);
        assert!(!a.as_str().is_empty());
    }
}
