//! Session identity
//!
//! A tracking session token is generated once when a tracker is created and
//! passed explicitly into every event it emits.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Prefix carried by every generated session token
pub const SESSION_PREFIX: &str = "ffx_";

/// Opaque, process-lifetime-stable session token
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Issue a fresh random token
    pub fn generate() -> Self {
        Self(format!("{}{}", SESSION_PREFIX, Uuid::new_v4().simple()))
    }

    /// Wrap an existing token (e.g. one restored by the embedding page)
    pub fn from_existing(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_prefixed_and_unique() {
        let a = SessionId::generate();
        let b = SessionId::generate();
        assert!(a.as_str().starts_with(SESSION_PREFIX));
        assert_eq!(a.as_str().len(), SESSION_PREFIX.len() + 32);
        assert_ne!(a, b);
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id = SessionId::from_existing("ffx_fixed");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"ffx_fixed\"");
    }
}
